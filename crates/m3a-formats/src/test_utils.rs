//! Test utilities for format round-trip testing

use crate::BinaryFormat;
use std::fmt::Debug;

/// Test round-trip serialization for a format instance
///
/// Verifies that a format can be serialized and deserialized back
/// to an equivalent value, and that the bytes rebuild identically.
pub fn test_round_trip<T>(original: &T, options: T::Options) -> Result<(), Box<dyn std::error::Error>>
where
    T: BinaryFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data, options)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    T::verify_round_trip(&data, options)?;
    Ok(())
}
