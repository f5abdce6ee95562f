//! Quran verse references and lookup tables
//!
//! Pure value types shared by every component: ayah references, per-surah
//! ayah counts, juz boundaries, and a page table built from externally
//! supplied mushaf geometry.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// First surah number (Al-Fatihah)
pub const FIRST_SURAH: u16 = 1;
/// Last surah number (An-Nas)
pub const LAST_SURAH: u16 = 114;
/// At-Tawbah, the only surah besides Al-Fatihah without a basmala marker
pub const SURAH_TAWBAH: u16 = 9;

/// Ayah counts per surah (Hafs numbering), indexed by `surah - 1`.
///
/// Totals 6236 ayat across 114 surahs.
pub const AYAH_COUNTS: [u16; 114] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, //
    123, 111, 43, 52, 99, 128, 111, 110, 98, 135, //
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, //
    34, 30, 73, 54, 45, 83, 182, 88, 75, 85, //
    54, 53, 89, 59, 37, 35, 38, 29, 18, 45, //
    60, 49, 62, 55, 78, 96, 29, 22, 24, 13, //
    14, 11, 11, 18, 12, 12, 30, 52, 52, 44, //
    28, 28, 20, 56, 40, 31, 50, 40, 46, 42, //
    29, 19, 36, 25, 22, 17, 19, 26, 30, 20, //
    15, 21, 11, 8, 8, 19, 5, 8, 8, 11, //
    11, 8, 3, 9, 5, 4, 7, 3, 6, 3, //
    5, 4, 5, 6,
];

/// Transliterated surah names, indexed by `surah - 1`.
pub const SURAH_NAMES: [&str; 114] = [
    "Al-Fatihah",
    "Al-Baqarah",
    "Aal-E-Imran",
    "An-Nisa",
    "Al-Maidah",
    "Al-An'am",
    "Al-A'raf",
    "Al-Anfal",
    "At-Tawbah",
    "Yunus",
    "Hud",
    "Yusuf",
    "Ar-Ra'd",
    "Ibrahim",
    "Al-Hijr",
    "An-Nahl",
    "Al-Isra",
    "Al-Kahf",
    "Maryam",
    "Ta-Ha",
    "Al-Anbiya",
    "Al-Hajj",
    "Al-Mu'minun",
    "An-Nur",
    "Al-Furqan",
    "Ash-Shu'ara",
    "An-Naml",
    "Al-Qasas",
    "Al-Ankabut",
    "Ar-Rum",
    "Luqman",
    "As-Sajdah",
    "Al-Ahzab",
    "Saba",
    "Fatir",
    "Ya-Sin",
    "As-Saffat",
    "Sad",
    "Az-Zumar",
    "Ghafir",
    "Fussilat",
    "Ash-Shura",
    "Az-Zukhruf",
    "Ad-Dukhan",
    "Al-Jathiyah",
    "Al-Ahqaf",
    "Muhammad",
    "Al-Fath",
    "Al-Hujurat",
    "Qaf",
    "Adh-Dhariyat",
    "At-Tur",
    "An-Najm",
    "Al-Qamar",
    "Ar-Rahman",
    "Al-Waqi'ah",
    "Al-Hadid",
    "Al-Mujadila",
    "Al-Hashr",
    "Al-Mumtahanah",
    "As-Saff",
    "Al-Jumu'ah",
    "Al-Munafiqun",
    "At-Taghabun",
    "At-Talaq",
    "At-Tahrim",
    "Al-Mulk",
    "Al-Qalam",
    "Al-Haqqah",
    "Al-Ma'arij",
    "Nuh",
    "Al-Jinn",
    "Al-Muzzammil",
    "Al-Muddaththir",
    "Al-Qiyamah",
    "Al-Insan",
    "Al-Mursalat",
    "An-Naba",
    "An-Nazi'at",
    "Abasa",
    "At-Takwir",
    "Al-Infitar",
    "Al-Mutaffifin",
    "Al-Inshiqaq",
    "Al-Buruj",
    "At-Tariq",
    "Al-A'la",
    "Al-Ghashiyah",
    "Al-Fajr",
    "Al-Balad",
    "Ash-Shams",
    "Al-Layl",
    "Ad-Duha",
    "Ash-Sharh",
    "At-Tin",
    "Al-Alaq",
    "Al-Qadr",
    "Al-Bayyinah",
    "Az-Zalzalah",
    "Al-Adiyat",
    "Al-Qari'ah",
    "At-Takathur",
    "Al-Asr",
    "Al-Humazah",
    "Al-Fil",
    "Quraysh",
    "Al-Ma'un",
    "Al-Kawthar",
    "Al-Kafirun",
    "An-Nasr",
    "Al-Masad",
    "Al-Ikhlas",
    "Al-Falaq",
    "An-Nas",
];

/// Juz start references (30 ajza), indexed by `juz - 1`.
const JUZ_STARTS: [(u16, u16); 30] = [
    (1, 1),
    (2, 142),
    (2, 253),
    (3, 93),
    (4, 24),
    (4, 148),
    (5, 82),
    (6, 111),
    (7, 88),
    (8, 41),
    (9, 93),
    (11, 6),
    (12, 53),
    (15, 1),
    (17, 1),
    (18, 75),
    (21, 1),
    (23, 1),
    (25, 21),
    (27, 56),
    (29, 46),
    (33, 31),
    (36, 28),
    (39, 32),
    (41, 47),
    (46, 1),
    (51, 31),
    (58, 1),
    (67, 1),
    (78, 1),
];

/// Number of ayat in a surah, or `None` for an out-of-range surah number.
pub fn ayah_count(surah: u16) -> Option<u16> {
    if (FIRST_SURAH..=LAST_SURAH).contains(&surah) {
        Some(AYAH_COUNTS[(surah - 1) as usize])
    } else {
        None
    }
}

/// Transliterated name of a surah, or `None` for an out-of-range number.
pub fn surah_name(surah: u16) -> Option<&'static str> {
    if (FIRST_SURAH..=LAST_SURAH).contains(&surah) {
        Some(SURAH_NAMES[(surah - 1) as usize])
    } else {
        None
    }
}

/// Whether a surah opens with a basmala of its own.
///
/// Al-Fatihah counts the basmala as its first ayah and At-Tawbah has none,
/// so neither carries the invocation sentinel.
pub fn has_basmala(surah: u16) -> bool {
    surah != FIRST_SURAH && surah != SURAH_TAWBAH
}

/// Reference to a single ayah within a surah.
///
/// Ayah numbering is 1-based; ayah `0` is the invocation sentinel meaning
/// "the basmala preceding verse 1". The sentinel is only valid for surahs
/// where [`has_basmala`] holds, and is normalized back to ayah `1` before
/// being published as a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AyahRef {
    pub surah: u16,
    pub ayah: u16,
}

impl AyahRef {
    pub fn new(surah: u16, ayah: u16) -> Self {
        Self { surah, ayah }
    }

    /// Whether this reference points at a real ayah (or a legal sentinel).
    pub fn is_valid(&self) -> bool {
        match ayah_count(self.surah) {
            Some(count) => {
                if self.ayah == 0 {
                    has_basmala(self.surah)
                } else {
                    self.ayah <= count
                }
            }
            None => false,
        }
    }

    /// Whether this is the invocation sentinel (ayah `0`).
    pub fn is_invocation(&self) -> bool {
        self.ayah == 0
    }

    /// Sentinel-free form: the invocation maps to ayah 1 of the same surah.
    pub fn normalized(&self) -> Self {
        if self.ayah == 0 {
            Self::new(self.surah, 1)
        } else {
            *self
        }
    }

    /// Next ayah in reading order. Non-wrapping: `None` past the end of the
    /// last surah. The sentinel advances to ayah 1.
    pub fn next(&self) -> Option<Self> {
        let count = ayah_count(self.surah)?;
        if self.ayah < count {
            Some(Self::new(self.surah, self.ayah + 1))
        } else if self.surah < LAST_SURAH {
            Some(Self::new(self.surah + 1, 1))
        } else {
            None
        }
    }

    /// Previous ayah in reading order. Non-wrapping: `None` before the first
    /// ayah of the first surah.
    pub fn previous(&self) -> Option<Self> {
        if self.ayah > 1 {
            Some(Self::new(self.surah, self.ayah - 1))
        } else if self.surah > FIRST_SURAH {
            let prev = self.surah - 1;
            Some(Self::new(prev, ayah_count(prev)?))
        } else {
            None
        }
    }

    /// Last ayah of this reference's surah.
    pub fn surah_end(&self) -> Option<Self> {
        ayah_count(self.surah).map(|count| Self::new(self.surah, count))
    }

    /// Human-readable label, e.g. `"Al-Baqarah 2:255"`.
    pub fn label(&self) -> String {
        match surah_name(self.surah) {
            Some(name) => format!("{} {}:{}", name, self.surah, self.ayah),
            None => format!("{}:{}", self.surah, self.ayah),
        }
    }

    /// Juz (1-30) containing this ayah.
    pub fn juz(&self) -> u8 {
        let key = (self.surah, self.normalized().ayah);
        match JUZ_STARTS.binary_search(&key) {
            Ok(i) => (i + 1) as u8,
            Err(0) => 1,
            Err(i) => i as u8,
        }
    }

    /// Last ayah of the juz containing this ayah.
    pub fn juz_end(&self) -> Option<Self> {
        let juz = self.juz() as usize;
        if juz < JUZ_STARTS.len() {
            let (surah, ayah) = JUZ_STARTS[juz];
            Self::new(surah, ayah).previous()
        } else {
            AyahRef::new(LAST_SURAH, 1).surah_end()
        }
    }
}

impl std::fmt::Display for AyahRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

/// Page-number lookup built from mushaf geometry.
///
/// The geometry itself (which ayah starts each page) is layout data owned by
/// the surrounding application; this type only performs the lookups the
/// orchestrator needs. Page numbers are 1-based.
#[derive(Debug, Clone)]
pub struct PageTable {
    starts: Vec<AyahRef>,
}

impl PageTable {
    /// Build a table from the first ayah of each page, in page order.
    pub fn from_starts(starts: Vec<AyahRef>) -> Result<Self> {
        if starts.is_empty() {
            return Err(Error::PageTable("page table is empty".into()));
        }
        if starts[0] != AyahRef::new(FIRST_SURAH, 1) {
            return Err(Error::PageTable("first page must start at 1:1".into()));
        }
        for window in starts.windows(2) {
            if window[1] <= window[0] {
                return Err(Error::PageTable(format!(
                    "page starts not strictly ascending at {}",
                    window[1]
                )));
            }
        }
        for start in &starts {
            if !start.is_valid() || start.ayah == 0 {
                return Err(Error::PageTable(format!("invalid page start {start}")));
            }
        }
        Ok(Self { starts })
    }

    /// Coarse fallback table with one page per surah, for callers that have
    /// not loaded real mushaf geometry.
    pub fn surah_aligned() -> Self {
        let starts = (FIRST_SURAH..=LAST_SURAH)
            .map(|surah| AyahRef::new(surah, 1))
            .collect();
        Self { starts }
    }

    /// Number of pages.
    pub fn len(&self) -> u16 {
        self.starts.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Page containing the given ayah. The sentinel is looked up as ayah 1.
    pub fn page_for(&self, ayah: AyahRef) -> u16 {
        let key = ayah.normalized();
        match self.starts.binary_search(&key) {
            Ok(i) => (i + 1) as u16,
            Err(0) => 1,
            Err(i) => i as u16,
        }
    }

    /// First and last ayah of a page. Out-of-range pages clamp to the table.
    pub fn bounds(&self, page: u16) -> (AyahRef, AyahRef) {
        let idx = (page.max(1) as usize - 1).min(self.starts.len() - 1);
        let start = self.starts[idx];
        let end = match self.starts.get(idx + 1) {
            // Page starts are never 1:1-of-surah-1 past index 0, and never
            // ayah 0, so previous() cannot fail here.
            Some(next) => next.previous().unwrap_or(*next),
            None => AyahRef::new(LAST_SURAH, AYAH_COUNTS[113]),
        };
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ayah_counts_total() {
        let total: u32 = AYAH_COUNTS.iter().map(|&c| c as u32).sum();
        assert_eq!(total, 6236);
        assert_eq!(ayah_count(1), Some(7));
        assert_eq!(ayah_count(114), Some(6));
        assert_eq!(ayah_count(0), None);
        assert_eq!(ayah_count(115), None);
    }

    #[test]
    fn validity_and_sentinel() {
        assert!(AyahRef::new(2, 255).is_valid());
        assert!(!AyahRef::new(2, 287).is_valid());
        assert!(!AyahRef::new(115, 1).is_valid());

        // Sentinel is legal only where a basmala exists
        assert!(AyahRef::new(2, 0).is_valid());
        assert!(!AyahRef::new(1, 0).is_valid());
        assert!(!AyahRef::new(SURAH_TAWBAH, 0).is_valid());

        assert_eq!(AyahRef::new(2, 0).normalized(), AyahRef::new(2, 1));
        assert_eq!(AyahRef::new(2, 5).normalized(), AyahRef::new(2, 5));
    }

    #[test]
    fn next_is_non_wrapping() {
        assert_eq!(AyahRef::new(1, 6).next(), Some(AyahRef::new(1, 7)));
        assert_eq!(AyahRef::new(1, 7).next(), Some(AyahRef::new(2, 1)));
        assert_eq!(AyahRef::new(114, 6).next(), None);
        assert_eq!(AyahRef::new(2, 0).next(), Some(AyahRef::new(2, 1)));
    }

    #[test]
    fn previous_is_non_wrapping() {
        assert_eq!(AyahRef::new(2, 1).previous(), Some(AyahRef::new(1, 7)));
        assert_eq!(AyahRef::new(2, 2).previous(), Some(AyahRef::new(2, 1)));
        assert_eq!(AyahRef::new(1, 1).previous(), None);
        assert_eq!(AyahRef::new(114, 1).previous(), Some(AyahRef::new(113, 5)));
    }

    #[test]
    fn juz_lookup() {
        assert_eq!(AyahRef::new(1, 1).juz(), 1);
        assert_eq!(AyahRef::new(2, 141).juz(), 1);
        assert_eq!(AyahRef::new(2, 142).juz(), 2);
        assert_eq!(AyahRef::new(78, 1).juz(), 30);
        assert_eq!(AyahRef::new(114, 6).juz(), 30);

        assert_eq!(AyahRef::new(1, 1).juz_end(), Some(AyahRef::new(2, 141)));
        assert_eq!(AyahRef::new(114, 1).juz_end(), Some(AyahRef::new(114, 6)));
    }

    #[test]
    fn labels() {
        assert_eq!(AyahRef::new(2, 255).label(), "Al-Baqarah 2:255");
        assert_eq!(AyahRef::new(1, 1).to_string(), "1:1");
    }

    #[test]
    fn page_table_lookup() {
        let pages = PageTable::from_starts(vec![
            AyahRef::new(1, 1),
            AyahRef::new(2, 1),
            AyahRef::new(2, 6),
            AyahRef::new(3, 1),
        ])
        .unwrap();

        assert_eq!(pages.len(), 4);
        assert_eq!(pages.page_for(AyahRef::new(1, 5)), 1);
        assert_eq!(pages.page_for(AyahRef::new(2, 1)), 2);
        assert_eq!(pages.page_for(AyahRef::new(2, 5)), 2);
        assert_eq!(pages.page_for(AyahRef::new(2, 6)), 3);
        assert_eq!(pages.page_for(AyahRef::new(2, 286)), 3);
        assert_eq!(pages.page_for(AyahRef::new(50, 1)), 4);
        // Sentinel looked up as ayah 1
        assert_eq!(pages.page_for(AyahRef::new(2, 0)), 2);

        assert_eq!(pages.bounds(1), (AyahRef::new(1, 1), AyahRef::new(1, 7)));
        assert_eq!(pages.bounds(2), (AyahRef::new(2, 1), AyahRef::new(2, 5)));
        assert_eq!(
            pages.bounds(4),
            (AyahRef::new(3, 1), AyahRef::new(114, 6))
        );
    }

    #[test]
    fn page_table_rejects_bad_geometry() {
        assert!(PageTable::from_starts(vec![]).is_err());
        assert!(PageTable::from_starts(vec![AyahRef::new(2, 1)]).is_err());
        assert!(PageTable::from_starts(vec![
            AyahRef::new(1, 1),
            AyahRef::new(3, 1),
            AyahRef::new(2, 1),
        ])
        .is_err());
    }

    #[test]
    fn surah_aligned_fallback() {
        let pages = PageTable::surah_aligned();
        assert_eq!(pages.len(), 114);
        assert!(!pages.is_empty());
        assert_eq!(pages.page_for(AyahRef::new(9, 129)), 9);
        assert_eq!(
            pages.bounds(9),
            (AyahRef::new(9, 1), AyahRef::new(9, 129))
        );
    }
}
