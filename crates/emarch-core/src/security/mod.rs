//! Pre-extraction safety checks.

pub mod scanner;

pub use scanner::ListingHeader;
pub use scanner::ListingStyle;
pub use scanner::PathSafetyScanner;
pub use scanner::PathSafetyVerdict;
pub use scanner::scan_listing;
