use crate::overlay::PointerPhase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    StartOverlay,
    StopOverlay,
    RequestPermission,
    GrantPermission,
    Pointer { phase: PointerPhase, x: f32, y: f32 },
    Tap { x: f32, y: f32 },
    ToggleVisibility { visible: Option<bool> },
    KeepScreenOn(bool),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  start | stop            start or stop the overlay
  request | grant         ask for / grant the overlay permission
  tap X Y                 quick press and release (collapse, expand, close)
  down X Y | move X Y | up X Y | cancel
                          pointer events on the widget (screen pixels)
  show | hide | toggle    temperature panel visibility
  keepon on|off           keep the screen awake while the panel is open
  status                  overlay state and panel contents
  quit                    stop everything and exit";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = words.collect();
    let head = head.to_ascii_lowercase();

    let command = match head.as_str() {
        "start" => ConsoleCommand::StartOverlay,
        "stop" => ConsoleCommand::StopOverlay,
        "request" => ConsoleCommand::RequestPermission,
        "grant" => ConsoleCommand::GrantPermission,
        "down" => parse_pointer(PointerPhase::Down, &args)?,
        "move" => parse_pointer(PointerPhase::Move, &args)?,
        "up" => parse_pointer(PointerPhase::Up, &args)?,
        "tap" => {
            let (x, y) = parse_point(&args, "tap X Y")?;
            ConsoleCommand::Tap { x, y }
        }
        "cancel" => ConsoleCommand::Pointer {
            phase: PointerPhase::Cancel,
            x: 0.0,
            y: 0.0,
        },
        "show" => ConsoleCommand::ToggleVisibility {
            visible: Some(true),
        },
        "hide" => ConsoleCommand::ToggleVisibility {
            visible: Some(false),
        },
        "toggle" => ConsoleCommand::ToggleVisibility { visible: None },
        "keepon" => match args.as_slice() {
            [flag] if flag.eq_ignore_ascii_case("on") => ConsoleCommand::KeepScreenOn(true),
            [flag] if flag.eq_ignore_ascii_case("off") => ConsoleCommand::KeepScreenOn(false),
            _ => return Err(ParseError::Usage("keepon on|off")),
        },
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => return Err(ParseError::Unknown(head)),
    };
    Ok(command)
}

fn parse_pointer(phase: PointerPhase, args: &[&str]) -> Result<ConsoleCommand, ParseError> {
    let (x, y) = parse_point(args, "down|move|up X Y")?;
    Ok(ConsoleCommand::Pointer { phase, x, y })
}

fn parse_point(args: &[&str], usage: &'static str) -> Result<(f32, f32), ParseError> {
    let [x, y] = args else {
        return Err(ParseError::Usage(usage));
    };
    let x: f32 = x.parse().map_err(|_| ParseError::Usage(usage))?;
    let y: f32 = y.parse().map_err(|_| ParseError::Usage(usage))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(ParseError::Usage(usage));
    }
    Ok((x, y))
}
