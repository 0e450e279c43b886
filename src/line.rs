//! Line classification
//!
//! Recognizes the handful of EverQuest log lines the engine cares about
//! and turns them into typed records. Anything else is `None`.
use crate::auction::{Guild, PlayerName};
use anyhow::Result;
use regex::{Captures, Regex};
use std::fmt;

/// Class shown for players hiding behind `/anonymous`
pub const UNKNOWN_CLASS: &str = "??";

const ANONYMOUS: &str = "ANONYMOUS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Anonymous,
    Known(u32),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Anonymous => f.write_str(ANONYMOUS),
            Level::Known(level) => write!(f, "{level}"),
        }
    }
}

/// One player line of a `/who` listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub timestamp: String,
    pub name: PlayerName,
    pub level: Level,
    pub class: String,
    pub race: Option<String>,
    pub guild: Option<Guild>,
}

/// A chat message: who said what, and when
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLine {
    pub timestamp: String,
    pub speaker: PlayerName,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogLine {
    RosterReset { timestamp: String },
    RosterEntry(RosterEntry),
    OutOfCharacter(ChatLine),
    Auction(ChatLine),
}

#[derive(Clone, Copy, Debug)]
enum LineKind {
    RosterReset,
    RosterEntry,
    OutOfCharacter,
    Auction,
}

struct Matcher {
    kind: LineKind,
    pattern: Regex,
}

/// Ordered set of line patterns; the first one that matches wins
pub struct Classifier {
    matchers: Vec<Matcher>,
}

impl Classifier {
    pub fn new() -> Result<Self> {
        const TIMESTAMP: &str = r"^\[(?P<timestamp>[^\]]+)\] ";

        let matchers = [
            (
                LineKind::RosterReset,
                r"Players (?:on|in) EverQuest:\s*$".to_owned(),
            ),
            (
                LineKind::RosterEntry,
                format!(
                    r"(?:AFK +)?\[(?:(?P<anonymous>{ANONYMOUS})|(?P<level>\d+) (?P<class>[A-Za-z ]+?))\] (?P<name>[A-Za-z]+)(?: +\((?P<race>[^)]+)\))?(?: +<(?P<guild>[^>]+)>)?(?: +.*)?$"
                ),
            ),
            (
                LineKind::OutOfCharacter,
                r"(?P<speaker>[A-Za-z]+) says out of character, '(?P<body>.*)'$".to_owned(),
            ),
            (
                LineKind::Auction,
                r"(?P<speaker>[A-Za-z]+) auctions, '(?P<body>.*)'$".to_owned(),
            ),
        ]
        .into_iter()
        .map(|(kind, pattern)| -> Result<Matcher> {
            Ok(Matcher {
                kind,
                pattern: Regex::new(&format!("{TIMESTAMP}{pattern}"))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

        Ok(Self { matchers })
    }

    pub fn classify(&self, line: &str) -> Option<LogLine> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        self.matchers.iter().find_map(|matcher| {
            let caps = matcher.pattern.captures(line)?;
            match matcher.kind {
                LineKind::RosterReset => Some(LogLine::RosterReset {
                    timestamp: caps["timestamp"].to_owned(),
                }),
                LineKind::RosterEntry => roster_entry(&caps).map(LogLine::RosterEntry),
                LineKind::OutOfCharacter => Some(LogLine::OutOfCharacter(chat_line(&caps))),
                LineKind::Auction => Some(LogLine::Auction(chat_line(&caps))),
            }
        })
    }
}

fn roster_entry(caps: &Captures) -> Option<RosterEntry> {
    let (level, class) = if caps.name("anonymous").is_some() {
        (Level::Anonymous, UNKNOWN_CLASS.to_owned())
    } else {
        (
            Level::Known(caps.name("level")?.as_str().parse().ok()?),
            caps.name("class")?.as_str().to_owned(),
        )
    };

    Some(RosterEntry {
        timestamp: caps["timestamp"].to_owned(),
        name: caps["name"].to_owned(),
        level,
        class,
        race: caps.name("race").map(|m| m.as_str().to_owned()),
        guild: caps.name("guild").map(|m| m.as_str().to_owned()),
    })
}

fn chat_line(caps: &Captures) -> ChatLine {
    ChatLine {
        timestamp: caps["timestamp"].to_owned(),
        speaker: caps["speaker"].to_owned(),
        body: caps["body"].to_owned(),
    }
}
