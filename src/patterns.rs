use regex::Regex;
use serde::Deserialize;

use crate::error::Result;

const RELEVANCE_PAT: &str = r"(?i)(รับสมัคร|ประกาศงาน|หางาน|สมัครงาน|พนักงาน|พาร์ทไทม์|Part.?time|รายวัน|รายชั่วโมง|รายเดือน|ค่าแรง|ค่าจ้าง|เงินเดือน|ด่วน)";
const DAY_PAT: &str = r"(?:วันละ|รายวัน|ต่อวัน|/ ?วัน)\s*(\d{2,6})";
const MONTH_PAT: &str = r"(?:เดือนละ|รายเดือน|ต่อเดือน|/ ?เดือน)\s*(\d{3,6})";
const HOUR_PAT: &str = r"(?:ชั่วโมงละ|รายชั่วโมง|ต่อชั่วโมง|/ ?ชั่วโมง)\s*(\d{2,6})";
const BAHT_PAT: &str = r"(\d[\d,\.]{2,6})\s*(?:บาท|฿)";
const RANGE_PAT: &str = r"(\d[\d,\.]{2,6})\s*[-–—]\s*(\d[\d,\.]{2,6})";

/// Known place names around Pathum Thani and north Bangkok.
pub const LOCATIONS: &[&str] = &[
    "ปทุมธานี", "รังสิต", "นนทบุรี", "คลองหลวง", "ธัญบุรี", "ลำลูกกา", "สามโคก",
    "เมืองปทุมธานี", "ตลาดรังสิต", "ฟิวเจอร์พาร์ค", "บึงยี่โถ",
    "คลองหนึ่ง", "คลองสอง", "คลองสาม", "คลองสี่", "คลองห้า",
    "ดอนเมือง", "อยุธยา", "แจ้งวัฒนะ", "ติวานนท์", "บางบัวทอง", "บางใหญ่", "บางกรวย",
    "ปากเกร็ด", "ศรีสมาน", "สะพานใหม่", "นวนคร", "มธ.รังสิต", "ธรรมศาสตร์รังสิต",
];

/// Role term → occupation category. Several terms share a category.
pub const ROLE_TERMS: &[(&str, &str)] = &[
    ("บาริสต้า", "บริการ"),
    ("ชงกาแฟ", "บริการ"),
    ("พนักงานขาย", "ขาย"),
    ("แคชเชียร์", "บริการ"),
    ("แม่บ้าน", "ทำความสะอาด"),
    ("ทำความสะอาด", "ทำความสะอาด"),
    ("แม่ครัว", "ครัว/อาหาร"),
    ("ผู้ช่วยครัว", "ครัว/อาหาร"),
    ("ส่งของ", "ขับรถ/ส่งของ"),
    ("ขับรถ", "ขับรถ/ส่งของ"),
    ("ไรเดอร์", "ขับรถ/ส่งของ"),
    ("พนักงานส่งของ", "ขับรถ/ส่งของ"),
    ("ช่างไฟ", "ช่างฝีมือ"),
    ("ช่างแอร์", "ช่างฝีมือ"),
    ("ช่างซ่อม", "ช่างฝีมือ"),
    ("ช่าง", "ช่างฝีมือ"),
    ("พนักงานคลังสินค้า", "คลังสินค้า/โลจิสติกส์"),
    ("คลังสินค้า", "คลังสินค้า/โลจิสติกส์"),
    ("แพ็คของ", "คลังสินค้า/โลจิสติกส์"),
    ("แพคของ", "คลังสินค้า/โลจิสติกส์"),
    ("พนักงานเสิร์ฟ", "บริการ"),
    ("เสิร์ฟ", "บริการ"),
    ("ร้านกาแฟ", "บริการ"),
    ("ร้านอาหาร", "ครัว/อาหาร"),
    ("แอดมิน", "แอดมิน/ออฟฟิศ"),
    ("เอกสาร", "แอดมิน/ออฟฟิศ"),
    ("พนักงานร้านสะดวกซื้อ", "ค้าปลีก"),
    ("เซเว่น", "ค้าปลีก"),
];

/// Magnitude cut-offs (baht) used when a wage has no cadence keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WageThresholds {
    /// Upper bound of a range at or below which the range is read as daily.
    pub range_day_max: u32,
    /// Upper bound of a range at or below which the range is read as monthly.
    pub range_month_max: u32,
    /// Bare amount at or below which the amount is read as daily.
    pub bare_day_max: u32,
    /// Bare amount at or below which the amount is read as monthly.
    pub bare_month_max: u32,
}

impl Default for WageThresholds {
    fn default() -> Self {
        WageThresholds {
            range_day_max: 2000,
            range_month_max: 80_000,
            bare_day_max: 1500,
            bare_month_max: 80_000,
        }
    }
}

#[derive(Debug)]
pub struct RoleTerm {
    pub term: &'static str,
    pub category: &'static str,
    pub matcher: Regex,
}

/// Compiled matchers and gazetteers shared by every extractor.
///
/// Built once per process and handed out by reference; nothing in here is
/// mutated after construction.
#[derive(Debug)]
pub struct PatternLibrary {
    pub relevance: Regex,
    pub day: Regex,
    pub month: Regex,
    pub hour: Regex,
    pub bare_amount: Regex,
    pub range: Regex,
    pub locations: &'static [&'static str],
    pub roles: Vec<RoleTerm>,
    pub thresholds: WageThresholds,
}

impl PatternLibrary {
    pub fn new(thresholds: WageThresholds) -> Result<Self> {
        let roles = ROLE_TERMS
            .iter()
            .map(|&(term, category)| {
                let matcher = Regex::new(&format!("(?i){}", regex::escape(term)))?;
                Ok(RoleTerm {
                    term,
                    category,
                    matcher,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PatternLibrary {
            relevance: Regex::new(RELEVANCE_PAT)?,
            day: Regex::new(DAY_PAT)?,
            month: Regex::new(MONTH_PAT)?,
            hour: Regex::new(HOUR_PAT)?,
            bare_amount: Regex::new(BAHT_PAT)?,
            range: Regex::new(RANGE_PAT)?,
            locations: LOCATIONS,
            roles,
            thresholds,
        })
    }

    pub fn is_job_like(&self, text: &str) -> bool {
        self.relevance.is_match(text)
    }

    /// Category for a matched term, resolved case-insensitively against the
    /// table keys. Unknown terms have no category.
    pub fn category_for(&self, matched: &str) -> Option<&'static str> {
        let needle = matched.to_lowercase();
        self.roles
            .iter()
            .find(|r| r.term.to_lowercase() == needle)
            .map(|r| r.category)
    }
}
