//! Canonicalize command implementation

use crate::cli::CanonicalizeArgs;
use crate::domain::canonical_name;
use crate::error::Result;

/// Print one canonical name per input name, in input order
pub fn run(args: CanonicalizeArgs) -> Result<()> {
    for name in &args.names {
        println!("{}", canonical_name(name));
    }
    Ok(())
}
