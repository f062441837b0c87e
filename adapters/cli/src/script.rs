//! Parses and runs the action list given on the command line.

use std::{fmt, io::Write, str::FromStr};

use anyhow::{bail, Context, Result};
use gridpaint_core::RelativeDirection;
use gridpaint_rendering::describe;
use gridpaint_system_painter::Painter;

/// One step of a painter script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Move,
    TurnLeft,
    Paint(String),
    Scrape,
    Take,
    SetPaint(i64),
    CanMove(RelativeDirection),
    Report,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(token: &str) -> Result<Self> {
        let (name, argument) = match token.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (token, None),
        };

        let action = match (name.to_ascii_lowercase().as_str(), argument) {
            ("move", None) => Self::Move,
            ("turn-left", None) => Self::TurnLeft,
            ("scrape", None) => Self::Scrape,
            ("take", None) => Self::Take,
            ("report", None) => Self::Report,
            ("paint", Some(color)) if !color.is_empty() => Self::Paint(color.to_owned()),
            ("set-paint", Some(amount)) => Self::SetPaint(
                amount
                    .parse()
                    .with_context(|| format!("`{amount}` is not a paint amount"))?,
            ),
            ("can-move", None) => Self::CanMove(RelativeDirection::Forward),
            ("can-move", Some(relative)) => Self::CanMove(relative.parse()?),
            ("paint", _) => bail!("`paint` needs a colour, as in `paint:red`"),
            ("set-paint", None) => bail!("`set-paint` needs an amount, as in `set-paint:5`"),
            (_, Some(_)) if is_plain(name) => bail!("`{name}` takes no argument"),
            _ => bail!("unknown action `{token}`"),
        };
        Ok(action)
    }
}

fn is_plain(name: &str) -> bool {
    ["move", "turn-left", "scrape", "take", "report"]
        .iter()
        .any(|plain| plain.eq_ignore_ascii_case(name))
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => f.write_str("move"),
            Self::TurnLeft => f.write_str("turn-left"),
            Self::Paint(color) => write!(f, "paint:{color}"),
            Self::Scrape => f.write_str("scrape"),
            Self::Take => f.write_str("take"),
            Self::SetPaint(amount) => write!(f, "set-paint:{amount}"),
            Self::CanMove(relative) => write!(f, "can-move:{relative}"),
            Self::Report => f.write_str("report"),
        }
    }
}

/// Parses every token, failing on the first invalid one.
pub(crate) fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Action>> {
    tokens
        .iter()
        .map(|token| token.as_ref().parse())
        .collect()
}

/// Runs `actions` in order. Queries write their answer to `out`; the first
/// failing action stops the script.
pub(crate) fn run(painter: &mut Painter, actions: &[Action], out: &mut impl Write) -> Result<()> {
    for (index, action) in actions.iter().enumerate() {
        apply(painter, action, out)
            .with_context(|| format!("action {} `{action}` failed", index + 1))?;
    }
    Ok(())
}

fn apply(painter: &mut Painter, action: &Action, out: &mut impl Write) -> Result<()> {
    match action {
        Action::Move => painter.move_forward()?,
        Action::TurnLeft => painter.turn_left(),
        Action::Paint(color) => painter.paint_named(color)?,
        Action::Scrape => painter.scrape_paint(),
        Action::Take => painter.take_paint(),
        Action::SetPaint(amount) => painter.set_paint(*amount),
        Action::CanMove(relative) => {
            writeln!(out, "can-move:{relative} {}", painter.can_move(*relative))?;
        }
        Action::Report => report(painter, out)?,
    }
    Ok(())
}

fn report(painter: &Painter, out: &mut impl Write) -> Result<()> {
    let paint = if painter.has_infinite_paint() {
        "unlimited".to_owned()
    } else {
        painter.paint_remaining().to_string()
    };
    writeln!(
        out,
        "{} at {} facing {}, paint {paint}, on paint: {}, on bucket: {}",
        painter.id(),
        painter.cell(),
        painter.facing(),
        painter.is_on_paint(),
        painter.is_on_bucket()
    )?;
    writeln!(out, "{}", describe(&painter.grid().borrow()))?;
    Ok(())
}
