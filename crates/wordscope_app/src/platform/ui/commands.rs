use wordscope_core::{ChartKind, Msg};

pub const HELP: &str = "\
Enter a URL to analyse it, or one of:
  :min N        only chart words seen at least N times
  :chart KIND   word-cloud | bar | line | pie | scatter | radar | gauge
  :charts       list chart types
  :clear        forget the current page
  :help         this text
  :quit         leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    Help,
    ListCharts,
    Invalid(String),
    Quit,
}

/// One line typed by the user. Anything that is not a `:` command is a URL.
pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Some(Command::Msg(Msg::UrlSubmitted(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let command = match name.to_ascii_lowercase().as_str() {
        "min" => match arg.parse::<u64>() {
            Ok(n) => Command::Msg(Msg::MinFrequencyChanged(n)),
            Err(_) => Command::Invalid(format!("`:min` needs a whole number, got {arg:?}")),
        },
        "chart" => match arg.parse::<ChartKind>() {
            Ok(kind) => Command::Msg(Msg::ChartSelected(kind)),
            Err(err) => Command::Invalid(err.to_string()),
        },
        "charts" => Command::ListCharts,
        "clear" => Command::Msg(Msg::UrlSubmitted(String::new())),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command :{other} (try :help)")),
    };
    Some(command)
}
