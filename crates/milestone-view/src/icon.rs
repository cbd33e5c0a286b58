use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An icon as written in the config: an absolute path or a theme icon name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

milestone::impl_string_newtype!(IconName);

pub fn find_icon_path(icon_name: &IconName, size: u16) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_str())
        .with_size(size)
        .with_scale(1)
        .find()
}
