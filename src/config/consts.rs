// src/config/consts.rs

// Source page
pub const PAGE_URL: &str = "https://www.nychealthandhospitals.org/covid-19-testing-sites/";
pub const HEADER_SELECTOR: &str = "h3.m-b-20";
pub const FLAT_ENTRY_SELECTOR: &str = "p.m-b-20";

// Geocoder
pub const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

// Local data
pub const DATA_FILE: &str = "data/centers.json";
pub const LOG_FILE: &str = ".store/debug.log";

// Net
pub const USER_AGENT: &str = concat!("testsites_scrape/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite

// Presenter
pub const PRE_REGISTER_LINE: &str = "Pre-register for your visit";
