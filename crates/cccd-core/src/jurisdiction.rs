//! # Jurisdiction Table
//!
//! Static reference table of the 63 registration jurisdictions, keyed by
//! the three-digit code stored in the first three positions of an
//! identifier. The table is built once per process and never mutated.
//!
//! [`JurisdictionCode`] validates the three-digit shape only. Whether a
//! well-formed code is actually assigned is a separate question answered
//! by [`JurisdictionTable::contains`]; the analyzer reports unknown codes
//! as parseable but invalid.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Macro-region a jurisdiction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Miền Bắc.
    North,
    /// Miền Trung.
    Central,
    /// Miền Nam.
    South,
}

impl Region {
    /// All regions, north to south.
    pub fn all() -> &'static [Region] {
        &[Self::North, Self::Central, Self::South]
    }

    /// Vietnamese name as printed on registry documents.
    pub fn local_name(self) -> &'static str {
        match self {
            Self::North => "Miền Bắc",
            Self::Central => "Miền Trung",
            Self::South => "Miền Nam",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::North => f.write_str("north"),
            Self::Central => f.write_str("central"),
            Self::South => f.write_str("south"),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "miền bắc" => Ok(Self::North),
            "central" | "miền trung" => Ok(Self::Central),
            "south" | "miền nam" => Ok(Self::South),
            other => Err(format!("unknown region: {other}")),
        }
    }
}

/// Administrative level of a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionKind {
    /// Centrally governed city (Thành phố Trung ương).
    Municipality,
    /// Province (Tỉnh).
    Province,
}

impl JurisdictionKind {
    /// Vietnamese name.
    pub fn local_name(self) -> &'static str {
        match self {
            Self::Municipality => "Thành phố Trung ương",
            Self::Province => "Tỉnh",
        }
    }
}

/// One row of the jurisdiction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Jurisdiction {
    /// Three-digit code used in identifiers.
    pub code: &'static str,
    /// Official name.
    pub name: &'static str,
    /// Macro-region.
    pub region: Region,
    /// Administrative level.
    pub kind: JurisdictionKind,
    /// Two-digit code used by the previous nine-digit card format.
    pub legacy_code: &'static str,
}

const fn row(
    code: &'static str,
    name: &'static str,
    region: Region,
    kind: JurisdictionKind,
    legacy_code: &'static str,
) -> Jurisdiction {
    Jurisdiction { code, name, region, kind, legacy_code }
}

/// Raw table rows in code order.
pub const JURISDICTIONS: [Jurisdiction; 63] = [
    row("001", "Hà Nội", Region::North, JurisdictionKind::Municipality, "01"),
    row("002", "Hà Giang", Region::North, JurisdictionKind::Province, "02"),
    row("004", "Cao Bằng", Region::North, JurisdictionKind::Province, "04"),
    row("006", "Bắc Kạn", Region::North, JurisdictionKind::Province, "06"),
    row("008", "Tuyên Quang", Region::North, JurisdictionKind::Province, "08"),
    row("010", "Lào Cai", Region::North, JurisdictionKind::Province, "10"),
    row("011", "Điện Biên", Region::North, JurisdictionKind::Province, "11"),
    row("012", "Lai Châu", Region::North, JurisdictionKind::Province, "12"),
    row("014", "Sơn La", Region::North, JurisdictionKind::Province, "14"),
    row("015", "Yên Bái", Region::North, JurisdictionKind::Province, "15"),
    row("017", "Hoà Bình", Region::North, JurisdictionKind::Province, "17"),
    row("019", "Thái Nguyên", Region::North, JurisdictionKind::Province, "19"),
    row("020", "Lạng Sơn", Region::North, JurisdictionKind::Province, "20"),
    row("022", "Quảng Ninh", Region::North, JurisdictionKind::Province, "22"),
    row("024", "Bắc Giang", Region::North, JurisdictionKind::Province, "24"),
    row("025", "Phú Thọ", Region::North, JurisdictionKind::Province, "25"),
    row("026", "Vĩnh Phúc", Region::North, JurisdictionKind::Province, "26"),
    row("027", "Bắc Ninh", Region::North, JurisdictionKind::Province, "27"),
    row("030", "Hải Dương", Region::North, JurisdictionKind::Province, "30"),
    row("031", "Hải Phòng", Region::North, JurisdictionKind::Municipality, "31"),
    row("033", "Hưng Yên", Region::North, JurisdictionKind::Province, "33"),
    row("034", "Thái Bình", Region::North, JurisdictionKind::Province, "34"),
    row("035", "Hà Nam", Region::North, JurisdictionKind::Province, "35"),
    row("036", "Nam Định", Region::North, JurisdictionKind::Province, "36"),
    row("037", "Ninh Bình", Region::North, JurisdictionKind::Province, "37"),
    row("038", "Thanh Hóa", Region::North, JurisdictionKind::Province, "38"),
    row("040", "Nghệ An", Region::North, JurisdictionKind::Province, "40"),
    row("042", "Hà Tĩnh", Region::North, JurisdictionKind::Province, "42"),
    row("044", "Quảng Bình", Region::Central, JurisdictionKind::Province, "44"),
    row("045", "Quảng Trị", Region::Central, JurisdictionKind::Province, "45"),
    row("046", "Thừa Thiên Huế", Region::Central, JurisdictionKind::Province, "46"),
    row("048", "Đà Nẵng", Region::Central, JurisdictionKind::Municipality, "48"),
    row("049", "Quảng Nam", Region::Central, JurisdictionKind::Province, "49"),
    row("051", "Quảng Ngãi", Region::Central, JurisdictionKind::Province, "51"),
    row("052", "Bình Định", Region::Central, JurisdictionKind::Province, "52"),
    row("054", "Phú Yên", Region::Central, JurisdictionKind::Province, "54"),
    row("056", "Khánh Hòa", Region::Central, JurisdictionKind::Province, "56"),
    row("058", "Ninh Thuận", Region::Central, JurisdictionKind::Province, "58"),
    row("060", "Bình Thuận", Region::Central, JurisdictionKind::Province, "60"),
    row("062", "Kon Tum", Region::Central, JurisdictionKind::Province, "62"),
    row("064", "Gia Lai", Region::Central, JurisdictionKind::Province, "64"),
    row("066", "Đắk Lắk", Region::Central, JurisdictionKind::Province, "66"),
    row("067", "Đắk Nông", Region::Central, JurisdictionKind::Province, "67"),
    row("068", "Lâm Đồng", Region::Central, JurisdictionKind::Province, "68"),
    row("070", "Bình Phước", Region::South, JurisdictionKind::Province, "70"),
    row("072", "Tây Ninh", Region::South, JurisdictionKind::Province, "72"),
    row("074", "Bình Dương", Region::South, JurisdictionKind::Province, "74"),
    row("075", "Đồng Nai", Region::South, JurisdictionKind::Province, "75"),
    row("077", "Bà Rịa - Vũng Tàu", Region::South, JurisdictionKind::Province, "77"),
    row("079", "Thành phố Hồ Chí Minh", Region::South, JurisdictionKind::Municipality, "79"),
    row("080", "Long An", Region::South, JurisdictionKind::Province, "80"),
    row("082", "Tiền Giang", Region::South, JurisdictionKind::Province, "82"),
    row("083", "Bến Tre", Region::South, JurisdictionKind::Province, "83"),
    row("084", "Trà Vinh", Region::South, JurisdictionKind::Province, "84"),
    row("086", "Vĩnh Long", Region::South, JurisdictionKind::Province, "86"),
    row("087", "Đồng Tháp", Region::South, JurisdictionKind::Province, "87"),
    row("089", "An Giang", Region::South, JurisdictionKind::Province, "89"),
    row("091", "Kiên Giang", Region::South, JurisdictionKind::Province, "91"),
    row("092", "Cần Thơ", Region::South, JurisdictionKind::Municipality, "92"),
    row("093", "Hậu Giang", Region::South, JurisdictionKind::Province, "93"),
    row("094", "Sóc Trăng", Region::South, JurisdictionKind::Province, "94"),
    row("095", "Bạc Liêu", Region::South, JurisdictionKind::Province, "95"),
    row("096", "Cà Mau", Region::South, JurisdictionKind::Province, "96"),
];

/// Immutable, process-wide index over [`JURISDICTIONS`].
#[derive(Debug)]
pub struct JurisdictionTable {
    by_code: BTreeMap<&'static str, &'static Jurisdiction>,
}

impl JurisdictionTable {
    /// The shared table, built on first access.
    pub fn global() -> &'static JurisdictionTable {
        static TABLE: OnceLock<JurisdictionTable> = OnceLock::new();
        TABLE.get_or_init(|| JurisdictionTable {
            by_code: JURISDICTIONS.iter().map(|j| (j.code, j)).collect(),
        })
    }

    /// Look up a jurisdiction by its three-digit code.
    pub fn lookup(&self, code: &str) -> Option<&'static Jurisdiction> {
        self.by_code.get(code).copied()
    }

    /// Whether `code` is assigned.
    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Number of jurisdictions.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// All jurisdictions in code order.
    pub fn all(&self) -> impl Iterator<Item = &'static Jurisdiction> + '_ {
        self.by_code.values().copied()
    }

    /// All assigned codes in ascending order.
    pub fn codes(&self) -> Vec<JurisdictionCode> {
        self.by_code
            .keys()
            .map(|c| JurisdictionCode(c.to_string()))
            .collect()
    }

    /// Jurisdictions in one macro-region.
    pub fn by_region(&self, region: Region) -> Vec<&'static Jurisdiction> {
        self.all().filter(|j| j.region == region).collect()
    }

    /// Jurisdictions of one administrative level.
    pub fn by_kind(&self, kind: JurisdictionKind) -> Vec<&'static Jurisdiction> {
        self.all().filter(|j| j.kind == kind).collect()
    }

    /// Case-insensitive substring search over names.
    pub fn search(&self, keyword: &str) -> Vec<&'static Jurisdiction> {
        let needle = keyword.trim().to_lowercase();
        self.all()
            .filter(|j| j.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Jurisdiction count per region.
    pub fn region_statistics(&self) -> BTreeMap<Region, usize> {
        let mut stats = BTreeMap::new();
        for j in self.all() {
            *stats.entry(j.region).or_insert(0) += 1;
        }
        stats
    }

    /// Jurisdiction count per administrative level.
    pub fn kind_statistics(&self) -> BTreeMap<JurisdictionKind, usize> {
        let mut stats = BTreeMap::new();
        for j in self.all() {
            *stats.entry(j.kind).or_insert(0) += 1;
        }
        stats
    }
}

/// A syntactically valid jurisdiction code: exactly three ASCII digits.
///
/// Membership in the table is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JurisdictionCode(String);

impl<'de> Deserialize<'de> for JurisdictionCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl JurisdictionCode {
    /// Create a code, validating the three-digit shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdictionCode`] otherwise.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidJurisdictionCode(s));
        }
        Ok(Self(s))
    }

    /// Create a code that must also be present in the table.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidJurisdictionCode`] for a malformed
    /// code and [`ValidationError::UnknownJurisdiction`] for an unassigned one.
    pub fn known(value: impl Into<String>) -> Result<Self, ValidationError> {
        let code = Self::new(value)?;
        if !JurisdictionTable::global().contains(code.as_str()) {
            return Err(ValidationError::UnknownJurisdiction(code.0));
        }
        Ok(code)
    }

    /// The three digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Table row, if assigned.
    pub fn info(&self) -> Option<&'static Jurisdiction> {
        JurisdictionTable::global().lookup(&self.0)
    }
}

impl std::fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for JurisdictionCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_63_unique_codes() {
        let table = JurisdictionTable::global();
        assert_eq!(table.len(), 63);
        assert_eq!(JURISDICTIONS.len(), 63);
    }

    #[test]
    fn rows_are_sorted_and_well_formed() {
        for pair in JURISDICTIONS.windows(2) {
            assert!(pair[0].code < pair[1].code, "{} !< {}", pair[0].code, pair[1].code);
        }
        for j in &JURISDICTIONS {
            assert!(JurisdictionCode::new(j.code).is_ok());
            assert_eq!(&j.code[1..], j.legacy_code);
        }
    }

    #[test]
    fn lookup_known_codes() {
        let table = JurisdictionTable::global();
        let hanoi = table.lookup("001").unwrap();
        assert_eq!(hanoi.name, "Hà Nội");
        assert_eq!(hanoi.region, Region::North);
        assert_eq!(hanoi.kind, JurisdictionKind::Municipality);
        assert_eq!(table.lookup("079").unwrap().region, Region::South);
        assert_eq!(table.lookup("048").unwrap().region, Region::Central);
    }

    #[test]
    fn unassigned_codes_are_absent() {
        let table = JurisdictionTable::global();
        assert!(!table.contains("003"));
        assert!(!table.contains("000"));
        assert!(!table.contains("097"));
        assert!(table.lookup("999").is_none());
    }

    #[test]
    fn region_statistics_sum() {
        let stats = JurisdictionTable::global().region_statistics();
        assert_eq!(stats[&Region::North], 28);
        assert_eq!(stats[&Region::Central], 16);
        assert_eq!(stats[&Region::South], 19);
    }

    #[test]
    fn five_municipalities() {
        let table = JurisdictionTable::global();
        let codes: Vec<_> = table
            .by_kind(JurisdictionKind::Municipality)
            .iter()
            .map(|j| j.code)
            .collect();
        assert_eq!(codes, vec!["001", "031", "048", "079", "092"]);
        assert_eq!(table.kind_statistics()[&JurisdictionKind::Province], 58);
    }

    #[test]
    fn search_is_case_insensitive() {
        let table = JurisdictionTable::global();
        let codes: Vec<_> = table.search("GIANG").iter().map(|j| j.code).collect();
        assert_eq!(codes, vec!["002", "024", "082", "089", "091", "093"]);
        // "Thành phố Hồ Chí Minh" contains "hà" inside "Thành".
        assert_eq!(table.search("hà").len(), 5);
        assert!(table.search("atlantis").is_empty());
    }

    #[test]
    fn by_region_matches_statistics() {
        let table = JurisdictionTable::global();
        for region in Region::all() {
            assert_eq!(table.by_region(*region).len(), table.region_statistics()[region]);
        }
    }

    #[test]
    fn code_validation() {
        assert!(JurisdictionCode::new("001").is_ok());
        assert!(JurisdictionCode::new("003").is_ok());
        assert!(JurisdictionCode::new("01").is_err());
        assert!(JurisdictionCode::new("0001").is_err());
        assert!(JurisdictionCode::new("0a1").is_err());
        assert!(JurisdictionCode::new("").is_err());
    }

    #[test]
    fn known_code_requires_assignment() {
        assert!(JurisdictionCode::known("079").is_ok());
        assert_eq!(
            JurisdictionCode::known("003"),
            Err(ValidationError::UnknownJurisdiction("003".into()))
        );
        assert!(matches!(
            JurisdictionCode::known("x"),
            Err(ValidationError::InvalidJurisdictionCode(_))
        ));
    }

    #[test]
    fn code_serde_validates() {
        let code: JurisdictionCode = serde_json::from_str("\"049\"").unwrap();
        assert_eq!(code.info().unwrap().name, "Quảng Nam");
        assert!(serde_json::from_str::<JurisdictionCode>("\"49\"").is_err());
    }

    #[test]
    fn region_parsing() {
        assert_eq!("North".parse::<Region>().unwrap(), Region::North);
        assert_eq!("Miền Nam".parse::<Region>().unwrap(), Region::South);
        assert!("west".parse::<Region>().is_err());
    }
}
