//! Source identifiers and display tags. The identifiers are used on the CLI,
//! in config files and as intermediate table file stems; the tags end up in
//! the `source` column of the unified table.

// User-friendly source ids (used in CLI and config)
pub const PASHA_BANK_SOURCE: &str = "pashabank";
pub const ABB_HOME_SOURCE: &str = "abbhome";
pub const XALQ_BANK_SOURCE: &str = "xalqbank";
pub const BIR_BANK_SOURCE: &str = "birbank";

// Display tags written to the unified table
pub const PASHA_BANK_TAG: &str = "PASHA Bank";
pub const ABB_HOME_TAG: &str = "ABB Home";
pub const XALQ_BANK_TAG: &str = "Xalq Bank";
pub const BIR_BANK_TAG: &str = "BirBank";

pub const PASHA_BANK_PARTNERS_URL: &str = "https://ipoteka.pashabank.az/az/ipoteka/partners/partners";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_FILE: &str = "data.csv";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/145.0.0.0 Safari/537.36";

/// Canonical column order of the unified table.
pub const CANONICAL_FIELDS: [&str; 18] = [
    "source",
    "name",
    "partner_name",
    "region",
    "address",
    "phone",
    "email",
    "website",
    "facebook",
    "instagram",
    "logo_url",
    "down_payment",
    "annual_rate",
    "term",
    "min_loan_amount",
    "max_loan_amount",
    "latitude",
    "longitude",
];

// Extraction tuning
pub const TEXT_BLOCK_SCAN_LIMIT: usize = 300;
pub const TEXT_BLOCK_MIN_CHARS: usize = 10;
pub const RAW_TEXT_SEPARATOR: &str = " | ";
