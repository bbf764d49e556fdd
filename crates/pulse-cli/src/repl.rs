//! Line commands read from stdin while the client runs.

use pulse_gateway::ActivityKind;

/// Usage text printed by `help` and after a parse error.
pub(crate) const HELP: &str = "\
commands:
  connect <token>                          connect (or reconnect) with a token
  disconnect                               close the connection and forget the token
  activity <kind> <name..> [--details ..] [--state ..]
                                           set the current activity
                                           (kind: playing, streaming, listening, watching, custom, competing)
  clear                                    clear the current activity
  status                                   show connection, identity, and presence
  help                                     show this text
  quit                                     disconnect and exit";

/// One parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplCommand {
    Connect(String),
    Disconnect,
    Activity {
        kind: ActivityKind,
        name: String,
        details: Option<String>,
        state: Option<String>,
    },
    Clear,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head.to_lowercase().as_str() {
        "connect" => match rest.as_slice() {
            [token] => ReplCommand::Connect((*token).to_owned()),
            _ => return Err("usage: connect <token>".to_owned()),
        },
        "disconnect" => ReplCommand::Disconnect,
        "activity" => parse_activity(&rest)?,
        "clear" => ReplCommand::Clear,
        "status" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

#[derive(Clone, Copy)]
enum Field {
    Name,
    Details,
    State,
}

fn parse_activity(words: &[&str]) -> Result<ReplCommand, String> {
    let Some((kind, rest)) = words.split_first() else {
        return Err("usage: activity <kind> <name..> [--details ..] [--state ..]".to_owned());
    };
    let kind: ActivityKind = kind.parse().map_err(|e| format!("{e}"))?;

    let mut name = Vec::new();
    let mut details = Vec::new();
    let mut state = Vec::new();
    let mut field = Field::Name;
    for word in rest {
        match *word {
            "--details" => field = Field::Details,
            "--state" => field = Field::State,
            word => match field {
                Field::Name => name.push(word),
                Field::Details => details.push(word),
                Field::State => state.push(word),
            },
        }
    }

    if name.is_empty() {
        return Err("activity name is required".to_owned());
    }
    let joined = |parts: Vec<&str>| (!parts.is_empty()).then(|| parts.join(" "));

    Ok(ReplCommand::Activity {
        kind,
        name: name.join(" "),
        details: joined(details),
        state: joined(state),
    })
}
