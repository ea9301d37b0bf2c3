use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem};

/// Strips surrounding double quotes from configuration strings, e.g. paths.
pub trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    /// Trims every value and removes one pair of enclosing `"` if present. Unquoted values are
    /// kept as they are, so `path = data/ratings.dat` and `path = "data/ratings.dat"` are equal.
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|v| {
            let v = v.trim();

            if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
                MapAction::Replace(vec![v[1..v.len() - 1].to_owned()])
            } else {
                MapAction::Replace(vec![v.to_owned()])
            }
        })
    }
}
