//! Line-oriented command parser for the terminal session.
//!
//! ```text
//! plant <plot> <crop>      harvest <plot>       bulldoze <plot>
//! tend <plot> <malady>     upgrade              buy <decoration>
//! status                   reset                help
//! quit
//! ```
//!
//! Parse errors are reported to the player and never reach the processor.

use std::str::FromStr;

use homestead_types::{Command, CropId, DecorationId, Malady, PlotId, UnknownMalady};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A command for the action processor.
    Command(Command),
    /// Print the farm.
    Status,
    /// Start over with a fresh farm.
    Reset,
    /// Print the command list.
    Help,
    /// Save and exit.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a known command.
    #[error("unknown command '{0}' (try 'help')")]
    UnknownVerb(String),

    /// A required argument is missing.
    #[error("'{verb}' needs a {what}")]
    Missing {
        /// Command being parsed.
        verb: &'static str,
        /// Description of the missing argument.
        what: &'static str,
    },

    /// Extra words after a complete command.
    #[error("unexpected '{0}' at end of command")]
    Trailing(String),

    /// The plot argument is not a number.
    #[error("'{0}' is not a plot number")]
    BadPlot(String),

    /// The malady argument is not recognized.
    #[error(transparent)]
    BadMalady(#[from] UnknownMalady),
}

/// Command list shown by `help`.
pub const HELP: &str = "\
Commands:
  plant <plot> <crop>     plant a crop (e.g. plant 0 radish)
  harvest <plot>          harvest a ready crop
  tend <plot> <malady>    clear buggy, weedy or dry
  bulldoze <plot>         destroy a crop without reward
  upgrade                 upgrade the farmhouse
  buy <decoration>        buy a decoration
  status                  show the farm
  reset                   start over
  quit                    save and exit";

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse_line(line: &str) -> Result<Option<Input>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let input = match verb.to_ascii_lowercase().as_str() {
        "plant" => {
            let plot_id = plot_arg(words.next(), "plant")?;
            let crop = words.next().ok_or(ParseError::Missing {
                verb: "plant",
                what: "crop name",
            })?;
            Input::Command(Command::Plant {
                plot_id,
                crop_id: CropId::new(crop.to_ascii_lowercase()),
            })
        }
        "harvest" => Input::Command(Command::Harvest {
            plot_id: plot_arg(words.next(), "harvest")?,
        }),
        "tend" => {
            let plot_id = plot_arg(words.next(), "tend")?;
            let malady = words.next().ok_or(ParseError::Missing {
                verb: "tend",
                what: "malady (buggy, weedy or dry)",
            })?;
            Input::Command(Command::Tend {
                plot_id,
                malady: Malady::from_str(malady)?,
            })
        }
        "bulldoze" => Input::Command(Command::Bulldoze {
            plot_id: plot_arg(words.next(), "bulldoze")?,
        }),
        "upgrade" => Input::Command(Command::UpgradeHouse),
        "buy" => {
            let item = words.next().ok_or(ParseError::Missing {
                verb: "buy",
                what: "decoration name",
            })?;
            Input::Command(Command::BuyDecoration {
                decoration_id: DecorationId::new(item.to_ascii_lowercase()),
            })
        }
        "status" | "look" => Input::Status,
        "reset" => Input::Reset,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(ParseError::UnknownVerb(other.to_owned())),
    };

    if let Some(extra) = words.next() {
        return Err(ParseError::Trailing(extra.to_owned()));
    }
    Ok(Some(input))
}

fn plot_arg(word: Option<&str>, verb: &'static str) -> Result<PlotId, ParseError> {
    let word = word.ok_or(ParseError::Missing {
        verb,
        what: "plot number",
    })?;
    word.trim_start_matches('#')
        .parse::<u32>()
        .ok()
        .map(PlotId)
        .ok_or_else(|| ParseError::BadPlot(word.to_owned()))
}
