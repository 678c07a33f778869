// src/events/fields.rs
//
// Heuristic detail extraction from filing prose. Each helper tries its
// patterns in order and returns the first hit; lookup tables are checked in
// list order, so earlier (more specific) entries win.
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

fn compile<S: AsRef<str>>(patterns: &[S]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pat| Regex::new(pat.as_ref()).expect("Failed to compile detail pattern"))
        .collect()
}

macro_rules! patterns {
    ($name:ident, [$($pat:expr),+ $(,)?]) => {
        static $name: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[$($pat),+]));
    };
}

// Date phrases: "January 5, 2024" or "1/5/2024".
const WORDY_DATE: &str = r"([A-Z][a-z]+ \d{1,2},? \d{4})";
const NUMERIC_DATE: &str = r"(\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4})";

patterns!(NEW_NAME_RE, [
    r#"(?i)change(?:d|s)? (?:the |its |their )?(?:corporate |company )?name (?:to|from) ["']([^"']+)["']"#,
    r#"(?i)new (?:corporate |company )?name (?:will be|is) ["']([^"']+)["']"#,
    r#"(?i)rename(?:d|s)? (?:the company|itself) (?:to|as) ["']([^"']+)["']"#,
    r"(?i)chang(?:e|es|ed|ing) (?:its|their|the company's) (?:corporate )?name to ([^.;,\n]+)",
]);

patterns!(OLD_TICKER_RE, [
    r#"(?i)(?:current|old|previous) (?:ticker|trading) symbol (?:is|was) ["']([^"']{1,5})["']"#,
    r#"(?i)ticker symbol (?:from|changed from) ["']([^"']{1,5})["']"#,
]);

patterns!(NEW_TICKER_RE, [
    r#"(?i)(?:new|changed) (?:ticker|trading) symbol (?:will be|is) ["']([^"']{1,5})["']"#,
    r#"(?i)ticker symbol (?:to|changed to) ["']([^"']{1,5})["']"#,
    r#"(?i)ticker symbol from ["'][^"']{1,5}["'] to ["']([^"']{1,5})["']"#,
]);

static EFFECTIVE_DATE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"(?i)effective (?:as of |on |date[: ]+){WORDY_DATE}"),
        format!(r"(?i)will (?:be |become |take )effective (?:on |as of )?{WORDY_DATE}"),
        format!(r"(?i)effective date[: ]+{NUMERIC_DATE}"),
    ])
});

static RECORD_DATE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"(?i)record date (?:of |is |will be )?{WORDY_DATE}"),
        format!(r"(?i)record date (?:of |is |will be )?{NUMERIC_DATE}"),
    ])
});

static DISTRIBUTION_DATE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"(?i)distribution date (?:of |is |will be )?{WORDY_DATE}"),
        format!(r"(?i)distribution date (?:of |is |will be )?{NUMERIC_DATE}"),
    ])
});

static PAYMENT_DATE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"(?i)payment date (?:of |is |will be )?{WORDY_DATE}"),
        format!(r"(?i)payment date (?:of |is |will be )?{NUMERIC_DATE}"),
        format!(r"(?i)payable (?:on )?{WORDY_DATE}"),
        format!(r"(?i)will be paid (?:on )?{NUMERIC_DATE}"),
    ])
});

patterns!(SPLIT_RATIO_RE, [
    r"(?i)reverse (?:stock )?split (?:at a )?ratio of (?:(\d+)[: ](\d+)|(\d+) for (\d+))",
    r"(?i)(\d+)[: ](\d+) reverse (?:stock )?split",
    r"(?i)(\d+)-for-(\d+) reverse (?:stock )?split",
]);

patterns!(CURRENT_EXCHANGE_RE, [
    r"(?i)currently (?:listed|trading) on (?:the )?([A-Za-z ]+)",
    r"(?i)uplisting from (?:the )?([A-Za-z ]+)",
]);

patterns!(PRODUCT_NAME_RE, [
    r"(?i)FDA (?:approval|cleared|authorized) (?:for|of) (?:its |the )?([^,.;:]+)",
    r"(?i)approval (?:for|of) (?:its |the )?([^,.;:]+) (?:from|by) the FDA",
]);

patterns!(SPIN_OFF_UNIT_RE, [
    r"(?i)spin(?:-| )off of (?:its |the )?([^,.;:]+)",
    r"(?i)spin(?:-| )off (?:its |the )?([^,.;:]+)",
]);

patterns!(DIVIDEND_AMOUNT_RE, [
    r"(?i)special dividend of \$([\d.]+)",
    r"(?i)special dividend in the amount of \$([\d.]+)",
    r"(?i)\$([\d.]+) (?:per share )?special dividend",
]);

// Capture 1 is the figure, capture 2 the optional unit.
patterns!(DEBT_AMOUNT_RE, [
    r"(?i)(?:reduce|reducing|reduced|repay|repaying|repaid|refinance|refinancing|refinanced) (?:its |their |the )?debt (?:by |in the amount of |of |totaling )?\$([\d.,]+)(\s+million|\s+billion)?",
    r"(?i)\$([\d.,]+)(\s+million|\s+billion)? (?:of |in )?debt (?:reduction|repayment|refinancing)",
]);

patterns!(BUYBACK_AMOUNT_RE, [
    r"(?i)(?:repurchase|buyback)[^$.]{0,100}\$([\d,]+(?:\.\d+)?)(\s*(?:million|billion))?",
    r"(?i)\$([\d,]+(?:\.\d+)?)(\s*(?:million|billion))?\s+(?:share |stock )?(?:repurchase|buyback)",
]);

const TARGET_EXCHANGES: &[(&str, &str)] = &[
    ("nasdaq capital market", "Nasdaq Capital Market"),
    ("nasdaq global market", "Nasdaq Global Market"),
    ("nasdaq global select", "Nasdaq Global Select Market"),
    ("nyse american", "NYSE American"),
    ("nyse", "New York Stock Exchange"),
    ("nasdaq", "Nasdaq"),
];

const APPROVAL_TYPES: &[(&[&str], &str)] = &[
    (&["510(k)", "510k"], "510(k) Clearance"),
    (&["de novo"], "De Novo Classification"),
    (&["pma", "pre-market approval"], "Pre-Market Approval (PMA)"),
    (&["nda", "new drug application"], "New Drug Application (NDA)"),
    (&["bla", "biologics license"], "Biologics License Application (BLA)"),
    (&["anda", "abbreviated new drug"], "Abbreviated New Drug Application (ANDA)"),
    (&["emergency use", "eua"], "Emergency Use Authorization (EUA)"),
];
const DEFAULT_APPROVAL_TYPE: &str = "FDA Approval";

const DEBT_TYPES: &[(&[&str], &str)] = &[
    (&["refinanc"], "Refinancing"),
    (&["early repayment", "prepayment"], "Early Repayment"),
    (&["extinguish"], "Debt Extinguishment"),
    (&["restructur"], "Restructuring"),
    (&["repay", "reduc"], "Repayment/Reduction"),
];
const DEFAULT_DEBT_TYPE: &str = "Debt Transaction";

const DEFAULT_CURRENT_EXCHANGE: &str = "OTC Markets";

// Tried in order; two-digit years before four so "1/5/24" is not year 24.
const DATE_FORMATS: &[&str] = &[
    "%B %d %Y",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%m.%d.%y",
    "%m.%d.%Y",
    "%Y-%m-%d",
];

fn first_capture<'a>(patterns: &[Regex], text: &'a str) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn first_date(patterns: &[Regex], text: &str) -> Option<String> {
    first_capture(patterns, text).map(normalize_date)
}

fn lookup<'a>(table: &[(&[&str], &'a str)], text: &str) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(_, label)| *label)
}

/// Parses a calendar date in any of the formats filings use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().replace(',', "");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}

/// Filing dates arrive as `YYYY-MM-DD` or EDGAR's compact `YYYYMMDD`.
pub fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .ok()
}

/// `YYYY-MM-DD` when the text is a recognisable date, otherwise the text as-is.
pub fn normalize_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.trim().to_string(),
    }
}

/// Applies a "million"/"billion" suffix once.
fn scaled_amount(figure: &str, unit: Option<&str>) -> Option<f64> {
    let number = figure
        .replace(',', "")
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()?;
    let multiplier = match unit.map(|u| u.trim().to_lowercase()) {
        Some(u) if u == "million" => 1e6,
        Some(u) if u == "billion" => 1e9,
        _ => 1.0,
    };
    Some(number * multiplier)
}

fn first_amount(patterns: &[Regex], text: &str) -> Option<f64> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(text)?;
        scaled_amount(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))
    })
}

pub fn new_name(content: &str) -> Option<String> {
    first_capture(&NEW_NAME_RE, content).map(str::to_string)
}

pub fn old_ticker(content: &str) -> Option<String> {
    first_capture(&OLD_TICKER_RE, content).map(str::to_string)
}

pub fn new_ticker(content: &str) -> Option<String> {
    first_capture(&NEW_TICKER_RE, content).map(str::to_string)
}

pub fn effective_date(content: &str) -> Option<String> {
    first_date(&EFFECTIVE_DATE_RE, content)
}

pub fn record_date(content: &str) -> Option<String> {
    first_date(&RECORD_DATE_RE, content)
}

pub fn distribution_date(content: &str) -> Option<String> {
    first_date(&DISTRIBUTION_DATE_RE, content)
}

pub fn payment_date(content: &str) -> Option<String> {
    first_date(&PAYMENT_DATE_RE, content)
}

/// "N:M" from either "ratio of N:M", "ratio of N for M", "N:M reverse split"
/// or "N-for-M reverse split".
pub fn split_ratio(content: &str) -> Option<String> {
    SPLIT_RATIO_RE.iter().find_map(|re| {
        let caps = re.captures(content)?;
        match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
            (Some(a), Some(b), _, _) | (_, _, Some(a), Some(b)) => {
                Some(format!("{}:{}", a.as_str(), b.as_str()))
            }
            _ => None,
        }
    })
}

/// Defaults to OTC Markets: uplisting implies the shares trade somewhere lesser.
pub fn current_exchange(content: &str) -> String {
    first_capture(&CURRENT_EXCHANGE_RE, content)
        .unwrap_or(DEFAULT_CURRENT_EXCHANGE)
        .to_string()
}

pub fn target_exchange(content: &str) -> Option<String> {
    let lowered = content.to_lowercase();
    TARGET_EXCHANGES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, name)| name.to_string())
}

pub fn product_name(content: &str) -> Option<String> {
    first_capture(&PRODUCT_NAME_RE, content).map(str::to_string)
}

pub fn approval_type(content: &str) -> String {
    lookup(APPROVAL_TYPES, content)
        .unwrap_or(DEFAULT_APPROVAL_TYPE)
        .to_string()
}

pub fn spin_off_unit_name(content: &str) -> Option<String> {
    first_capture(&SPIN_OFF_UNIT_RE, content).map(str::to_string)
}

/// Per-share dollars.
pub fn dividend_amount(content: &str) -> Option<f64> {
    first_capture(&DIVIDEND_AMOUNT_RE, content).and_then(|figure| scaled_amount(figure, None))
}

/// Dollars.
pub fn debt_amount(content: &str) -> Option<f64> {
    first_amount(&DEBT_AMOUNT_RE, content)
}

pub fn debt_reduction_type(content: &str) -> String {
    lookup(DEBT_TYPES, content)
        .unwrap_or(DEFAULT_DEBT_TYPE)
        .to_string()
}

/// Dollars.
pub fn buyback_amount(content: &str) -> Option<f64> {
    first_amount(&BUYBACK_AMOUNT_RE, content)
}
