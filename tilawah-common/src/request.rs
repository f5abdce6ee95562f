//! Playback requests and the repeat policy
//!
//! An [`AudioRequest`] captures everything needed to (re)start playback:
//! reciter, starting ayah, repeat policy, repeat progress, and how far ahead
//! to prefetch. It serializes to a compact `/`-separated string so it can be
//! round-tripped through the native engine's opaque per-track tag slot.

use crate::error::Error;
use crate::quran::{AyahRef, PageTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repeat granularity, mirroring the user-facing repeat options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatAmount {
    OneAyah,
    ThreeAyah,
    FiveAyah,
    TenAyah,
    Page,
    Surah,
    Rub,
    Juz,
}

impl RepeatAmount {
    fn as_token(&self) -> &'static str {
        match self {
            RepeatAmount::OneAyah => "ayah",
            RepeatAmount::ThreeAyah => "3ayah",
            RepeatAmount::FiveAyah => "5ayah",
            RepeatAmount::TenAyah => "10ayah",
            RepeatAmount::Page => "page",
            RepeatAmount::Surah => "surah",
            RepeatAmount::Rub => "rub",
            RepeatAmount::Juz => "juz",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "ayah" => RepeatAmount::OneAyah,
            "3ayah" => RepeatAmount::ThreeAyah,
            "5ayah" => RepeatAmount::FiveAyah,
            "10ayah" => RepeatAmount::TenAyah,
            "page" => RepeatAmount::Page,
            "surah" => RepeatAmount::Surah,
            "rub" => RepeatAmount::Rub,
            "juz" => RepeatAmount::Juz,
            _ => return None,
        })
    }
}

impl Default for RepeatAmount {
    fn default() -> Self {
        RepeatAmount::OneAyah
    }
}

/// How many times to repeat before advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatCount {
    Times(u32),
    Unbounded,
}

/// Repeat policy: granularity plus count. Absent means "no repeat".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatInfo {
    pub amount: RepeatAmount,
    pub count: RepeatCount,
}

/// How much audio beyond the requested ayah to prefetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookaheadAmount {
    Page,
    Surah,
    Juz,
}

impl LookaheadAmount {
    fn as_token(&self) -> &'static str {
        match self {
            LookaheadAmount::Page => "page",
            LookaheadAmount::Surah => "surah",
            LookaheadAmount::Juz => "juz",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "page" => LookaheadAmount::Page,
            "surah" => LookaheadAmount::Surah,
            "juz" => LookaheadAmount::Juz,
            _ => return None,
        })
    }
}

impl Default for LookaheadAmount {
    fn default() -> Self {
        LookaheadAmount::Page
    }
}

/// A fully-specified playback request.
///
/// Constructed fresh for each play intent, and reconstructed (parsed) from
/// the currently playing track's tag whenever the engine reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRequest {
    pub reciter_id: u32,
    pub current: AyahRef,
    pub repeat: Option<RepeatInfo>,
    pub repeat_progress: u32,
    pub lookahead: LookaheadAmount,
}

impl AudioRequest {
    pub fn new(
        reciter_id: u32,
        current: AyahRef,
        repeat: Option<RepeatInfo>,
        lookahead: LookaheadAmount,
    ) -> Self {
        Self {
            reciter_id,
            current,
            repeat,
            repeat_progress: 0,
            lookahead,
        }
    }

    /// Inclusive ayah range this request covers: the current ayah (sentinel
    /// mapped to ayah 1) through the look-ahead extent.
    pub fn range(&self, pages: &PageTable) -> (AyahRef, AyahRef) {
        let from = self.current.normalized();
        let end = match self.lookahead {
            LookaheadAmount::Page => {
                let page = pages.page_for(from);
                pages.bounds(page).1
            }
            LookaheadAmount::Surah => from.surah_end().unwrap_or(from),
            LookaheadAmount::Juz => from.juz_end().unwrap_or(from),
        };
        // A look-ahead extent can sit before the current ayah (e.g. last
        // ayah of a page); never produce an inverted range.
        (from, end.max(from))
    }
}

/// Wire form, fixed field order:
/// `reciter/surah/ayah/repeat_amount/repeat_count/repeat_progress/lookahead`
/// with `-` standing in for "no repeat" and `*` for an unbounded count.
impl fmt::Display for AudioRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (amount, count) = match self.repeat {
            Some(info) => {
                let count = match info.count {
                    RepeatCount::Times(n) => n.to_string(),
                    RepeatCount::Unbounded => "*".to_string(),
                };
                (info.amount.as_token().to_string(), count)
            }
            None => ("-".to_string(), "-".to_string()),
        };
        write!(
            f,
            "{}/{}/{}/{}/{}/{}/{}",
            self.reciter_id,
            self.current.surah,
            self.current.ayah,
            amount,
            count,
            self.repeat_progress,
            self.lookahead.as_token()
        )
    }
}

impl FromStr for AudioRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedTag(s.to_string());
        let fields: Vec<&str> = s.split('/').collect();
        if fields.len() != 7 {
            return Err(malformed());
        }

        let reciter_id: u32 = fields[0].parse().map_err(|_| malformed())?;
        let surah: u16 = fields[1].parse().map_err(|_| malformed())?;
        let ayah: u16 = fields[2].parse().map_err(|_| malformed())?;
        let current = AyahRef::new(surah, ayah);
        if !current.is_valid() {
            return Err(Error::InvalidAyah(current.to_string()));
        }

        let repeat = match (fields[3], fields[4]) {
            ("-", "-") => None,
            (amount, count) => {
                let amount = RepeatAmount::from_token(amount).ok_or_else(malformed)?;
                let count = if count == "*" {
                    RepeatCount::Unbounded
                } else {
                    RepeatCount::Times(count.parse().map_err(|_| malformed())?)
                };
                Some(RepeatInfo { amount, count })
            }
        };

        let repeat_progress: u32 = fields[5].parse().map_err(|_| malformed())?;
        let lookahead = LookaheadAmount::from_token(fields[6]).ok_or_else(malformed)?;

        Ok(Self {
            reciter_id,
            current,
            repeat,
            repeat_progress,
            lookahead,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AudioRequest {
        AudioRequest {
            reciter_id: 3,
            current: AyahRef::new(2, 255),
            repeat: Some(RepeatInfo {
                amount: RepeatAmount::Page,
                count: RepeatCount::Times(3),
            }),
            repeat_progress: 1,
            lookahead: LookaheadAmount::Surah,
        }
    }

    #[test]
    fn wire_format_is_stable() {
        assert_eq!(sample().to_string(), "3/2/255/page/3/1/surah");

        let no_repeat = AudioRequest::new(0, AyahRef::new(2, 0), None, LookaheadAmount::Page);
        assert_eq!(no_repeat.to_string(), "0/2/0/-/-/0/page");
    }

    #[test]
    fn round_trips_stably() {
        for request in [
            sample(),
            AudioRequest::new(0, AyahRef::new(1, 1), None, LookaheadAmount::Juz),
            AudioRequest::new(
                7,
                AyahRef::new(114, 6),
                Some(RepeatInfo {
                    amount: RepeatAmount::OneAyah,
                    count: RepeatCount::Unbounded,
                }),
                LookaheadAmount::Page,
            ),
        ] {
            let wire = request.to_string();
            let parsed: AudioRequest = wire.parse().unwrap();
            assert_eq!(parsed, request);
            assert_eq!(parsed.to_string(), wire);
        }
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!("".parse::<AudioRequest>().is_err());
        assert!("garbage".parse::<AudioRequest>().is_err());
        assert!("1/2/3".parse::<AudioRequest>().is_err());
        assert!("1/2/3/-/-/0".parse::<AudioRequest>().is_err());
        assert!("x/2/3/-/-/0/page".parse::<AudioRequest>().is_err());
        assert!("1/2/3/bogus/2/0/page".parse::<AudioRequest>().is_err());
        assert!("1/2/3/-/-/0/everything".parse::<AudioRequest>().is_err());
        // Valid shape, invalid ayah
        assert!("1/2/999/-/-/0/page".parse::<AudioRequest>().is_err());
        // Sentinel illegal for At-Tawbah
        assert!("1/9/0/-/-/0/page".parse::<AudioRequest>().is_err());
    }

    #[test]
    fn range_honors_lookahead() {
        let pages = PageTable::from_starts(vec![
            AyahRef::new(1, 1),
            AyahRef::new(2, 1),
            AyahRef::new(2, 6),
        ])
        .unwrap();

        let mut request = AudioRequest::new(0, AyahRef::new(2, 2), None, LookaheadAmount::Page);
        assert_eq!(request.range(&pages), (AyahRef::new(2, 2), AyahRef::new(2, 5)));

        request.lookahead = LookaheadAmount::Surah;
        assert_eq!(request.range(&pages), (AyahRef::new(2, 2), AyahRef::new(2, 286)));

        request.lookahead = LookaheadAmount::Juz;
        assert_eq!(request.range(&pages), (AyahRef::new(2, 2), AyahRef::new(2, 141)));

        // Sentinel maps to ayah 1 for range purposes
        request.current = AyahRef::new(2, 0);
        request.lookahead = LookaheadAmount::Page;
        assert_eq!(request.range(&pages), (AyahRef::new(2, 1), AyahRef::new(2, 5)));
    }
}
