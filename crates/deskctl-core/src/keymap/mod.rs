//! Key name translation for keyboard actions.
//!
//! Clients name keys with short lowercase strings (`"a"`, `"enter"`,
//! `"ctrl"`).  The canonical representation handed to drivers is the USB HID
//! Usage ID ([`HidKeyCode`]), so a driver never has to parse strings itself.

pub mod hid;

pub use hid::HidKeyCode;

/// Unified key lookup used by the keyboard handlers.
pub struct KeyMapper;

impl KeyMapper {
    /// Resolves a client-facing key name to a [`HidKeyCode`].
    ///
    /// Matching is case-insensitive.  Returns `None` for names that have no
    /// mapping; callers report those as parameter errors.
    pub fn key_from_name(name: &str) -> Option<HidKeyCode> {
        HidKeyCode::from_key_name(name)
    }

    /// Resolves every name in `names`, failing on the first unknown one.
    ///
    /// # Errors
    ///
    /// Returns the offending name when any entry has no mapping.
    pub fn keys_from_names<'a, I>(names: I) -> Result<Vec<HidKeyCode>, &'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| Self::key_from_name(name).ok_or(name))
            .collect()
    }
}
