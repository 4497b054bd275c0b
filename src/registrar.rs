//! Registers the viewer as the OS default handler for the supported image
//! extensions.
//!
//! Re-running overwrites the same entries with identical values; there is
//! no rollback. Every failure (typically permissions) is returned as a
//! recoverable [`AppError::Register`] for the UI to show.

use crate::core::image_format::{mime_type, SUPPORTED_EXTENSIONS};
use crate::error::{AppError, Result};
use std::fs;
use std::path::Path;

pub const HANDLER_NAME: &str = "Quickview";

const DESKTOP_FILE: &str = "quickview.desktop";

/// Registers the currently running executable as the default viewer.
pub fn register_default_viewer() -> Result<()> {
    let exe = std::env::current_exe().map_err(|e| AppError::Register(e.to_string()))?;
    register_for_executable(&exe)
}

/// Unique MIME types covered by the supported extensions, in filter order.
fn associated_mime_types() -> Vec<&'static str> {
    let mut mimes = Vec::new();
    for ext in SUPPORTED_EXTENSIONS {
        if let Some(mime) = mime_type(ext) {
            if !mimes.contains(&mime) {
                mimes.push(mime);
            }
        }
    }
    mimes
}

#[cfg(windows)]
fn register_for_executable(exe: &Path) -> Result<()> {
    use windows::core::PCWSTR;
    use windows::Win32::System::Registry::{
        RegCloseKey, RegCreateKeyExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER, KEY_WRITE,
        REG_OPTION_NON_VOLATILE, REG_SZ,
    };

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    // Sets the default value of a subkey under HKCU. Per-user classes avoid
    // needing elevation for HKEY_CLASSES_ROOT.
    unsafe fn set_default_value(subkey: &str, value: &str) -> Result<()> {
        let subkey_w = wide(subkey);
        let mut key = HKEY::default();
        let status = RegCreateKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR(subkey_w.as_ptr()),
            None,
            PCWSTR::null(),
            REG_OPTION_NON_VOLATILE,
            KEY_WRITE,
            None,
            &mut key,
            None,
        );
        if status.is_err() {
            return Err(AppError::Register(format!(
                "cannot create registry key {subkey}: {status:?}"
            )));
        }
        let data = wide(value);
        let bytes = std::slice::from_raw_parts(data.as_ptr().cast::<u8>(), data.len() * 2);
        let status = RegSetValueExW(key, PCWSTR::null(), None, REG_SZ, Some(bytes));
        let _ = RegCloseKey(key);
        if status.is_err() {
            return Err(AppError::Register(format!(
                "cannot write registry key {subkey}: {status:?}"
            )));
        }
        Ok(())
    }

    let command = format!("\"{}\" \"%1\"", exe.display());
    for ext in SUPPORTED_EXTENSIONS {
        let base = format!("Software\\Classes\\.{ext}");
        unsafe {
            set_default_value(&base, HANDLER_NAME)?;
            set_default_value(&format!("{base}\\Shell\\Open\\command"), &command)?;
        }
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn register_for_executable(exe: &Path) -> Result<()> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Register("no XDG data directory".to_string()))?;
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Register("no XDG config directory".to_string()))?;
    register_xdg(&data_dir.join("applications"), &config_dir, exe)
}

#[cfg(not(any(windows, target_os = "linux")))]
fn register_for_executable(_exe: &Path) -> Result<()> {
    Err(AppError::Register(
        "default-viewer registration is not supported on this platform".to_string(),
    ))
}

/// Linux registration: a desktop entry naming the handler plus default
/// application entries for each MIME type in `mimeapps.list`.
fn register_xdg(applications_dir: &Path, config_dir: &Path, exe: &Path) -> Result<()> {
    fs::create_dir_all(applications_dir).map_err(|e| AppError::Register(e.to_string()))?;
    fs::write(applications_dir.join(DESKTOP_FILE), desktop_entry(exe))
        .map_err(|e| AppError::Register(e.to_string()))?;

    fs::create_dir_all(config_dir).map_err(|e| AppError::Register(e.to_string()))?;
    let mimeapps = config_dir.join("mimeapps.list");
    let existing = fs::read_to_string(&mimeapps).unwrap_or_default();
    fs::write(&mimeapps, updated_mimeapps(&existing))
        .map_err(|e| AppError::Register(e.to_string()))?;
    Ok(())
}

fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={HANDLER_NAME}\n\
         Exec=\"{}\" %f\n\
         MimeType={};\n\
         Terminal=false\n\
         Categories=Graphics;Viewer;\n",
        exe.display(),
        associated_mime_types().join(";"),
    )
}

/// Rewrites the `[Default Applications]` section of a `mimeapps.list` so
/// every supported MIME type points at our desktop entry, preserving all
/// unrelated lines and sections.
fn updated_mimeapps(existing: &str) -> String {
    let mimes = associated_mime_types();
    let mut lines: Vec<String> = Vec::new();
    let mut written: Vec<&str> = Vec::new();
    let mut in_defaults = false;
    let mut seen_defaults = false;

    let append_missing = |lines: &mut Vec<String>, written: &mut Vec<&str>| {
        for mime in &mimes {
            if !written.contains(mime) {
                lines.push(format!("{mime}={DESKTOP_FILE}"));
                written.push(*mime);
            }
        }
    };

    for line in existing.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if in_defaults {
                append_missing(&mut lines, &mut written);
            }
            in_defaults = trimmed == "[Default Applications]";
            seen_defaults |= in_defaults;
            lines.push(line.to_string());
            continue;
        }
        if in_defaults {
            if let Some((key, _)) = line.split_once('=') {
                if let Some(mime) = mimes.iter().find(|m| **m == key.trim()) {
                    lines.push(format!("{mime}={DESKTOP_FILE}"));
                    written.push(*mime);
                    continue;
                }
            }
        }
        lines.push(line.to_string());
    }

    if !seen_defaults {
        lines.push("[Default Applications]".to_string());
        in_defaults = true;
    }
    if in_defaults {
        append_missing(&mut lines, &mut written);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
