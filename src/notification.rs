//! Notification sources that get their own highlight color
//!
//! Each source is one slot for [`SlotRunner`](crate::SlotRunner): a new color
//! picked for a source replaces any recoloring still running for it.

use std::fmt;

/// Applications whose notifications are shown as a glow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NotificationSource {
    Facebook,
    Sms,
    WhatsApp,
}

impl NotificationSource {
    /// All sources, in display order.
    pub const ALL: [Self; 3] = [Self::Facebook, Self::Sms, Self::WhatsApp];

    /// Classifies a notification by the package name of the posting app.
    ///
    /// Returns `None` for apps that are not monitored.
    ///
    /// ```
    /// use chameleon_recolor::NotificationSource;
    ///
    /// assert_eq!(
    ///     NotificationSource::from_package_name("com.whatsapp"),
    ///     Some(NotificationSource::WhatsApp)
    /// );
    /// assert_eq!(NotificationSource::from_package_name("com.example.mail"), None);
    /// ```
    pub fn from_package_name(package: &str) -> Option<Self> {
        match package {
            "com.facebook.katana" | "com.facebook.lite" | "com.facebook.orca" => {
                Some(Self::Facebook)
            }
            "com.android.mms" | "com.google.android.talk" | "com.sonyericsson.conversations" => {
                Some(Self::Sms)
            }
            "com.whatsapp" => Some(Self::WhatsApp),
            _ => None,
        }
    }

    /// Lowercase name, also used for [`Display`](fmt::Display).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Sms => "sms",
            Self::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for NotificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_packages() {
        for package in ["com.facebook.katana", "com.facebook.lite", "com.facebook.orca"] {
            assert_eq!(
                NotificationSource::from_package_name(package),
                Some(NotificationSource::Facebook)
            );
        }
        for package in [
            "com.android.mms",
            "com.google.android.talk",
            "com.sonyericsson.conversations",
        ] {
            assert_eq!(
                NotificationSource::from_package_name(package),
                Some(NotificationSource::Sms)
            );
        }
    }

    #[test]
    fn unknown_packages_are_ignored() {
        assert_eq!(NotificationSource::from_package_name(""), None);
        assert_eq!(NotificationSource::from_package_name("com.WhatsApp"), None);
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = NotificationSource::ALL
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["facebook", "sms", "whatsapp"]);
    }
}
