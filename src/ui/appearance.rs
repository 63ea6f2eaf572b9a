//! OS appearance hint used when no dark-mode preference has been saved.

/// Preferred appearance used to pick a default when `dark_mode` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

/// Try to detect the preferred appearance via the OS-level app theme
/// preference. Returns None if no hint is available.
pub fn detect_preferred_appearance() -> Option<Appearance> {
    detect_via_os_hint()
}

fn detect_via_os_hint() -> Option<Appearance> {
    #[cfg(target_os = "macos")]
    {
        use std::process::Command;
        // `defaults read -g AppleInterfaceStyle` prints "Dark" when dark
        // mode is on and exits non-zero when the key is absent.
        if let Ok(output) = Command::new("/usr/bin/defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            if output.status.success()
                && String::from_utf8_lossy(&output.stdout)
                    .to_ascii_lowercase()
                    .contains("dark")
            {
                return Some(Appearance::Dark);
            }
        }
        return Some(Appearance::Light);
    }

    #[cfg(target_os = "windows")]
    {
        // HKCU\...\Personalize\AppsUseLightTheme: 1 = light, 0 = dark
        use winreg::enums::HKEY_CURRENT_USER;
        use winreg::RegKey;
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        if let Ok(personalize) =
            hkcu.open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        {
            if let Ok(value) = personalize.get_value::<u32, _>("AppsUseLightTheme") {
                return Some(if value == 0 {
                    Appearance::Dark
                } else {
                    Appearance::Light
                });
            }
        }
        return None;
    }

    #[cfg(target_os = "linux")]
    {
        // GNOME 42+: color-scheme is 'prefer-dark' or 'default'; older
        // setups often encode darkness in the gtk-theme name instead.
        if let Some(appearance) =
            gsettings_hint("color-scheme", "prefer-dark").or_else(|| gsettings_hint("gtk-theme", "-dark"))
        {
            return Some(appearance);
        }
        None
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(target_os = "linux")]
fn gsettings_hint(key: &str, dark_marker: &str) -> Option<Appearance> {
    use std::process::Command;

    let output = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", key])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).to_ascii_lowercase();
    if value.contains(dark_marker) {
        Some(Appearance::Dark)
    } else {
        Some(Appearance::Light)
    }
}
