use std::{env, iter::once};

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::ERROR_FILE_NOT_FOUND,
        System::Registry::{
            RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
            HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ,
        },
    },
};

use crate::error::PlatformError;

use super::{Autostart, AUTOSTART_APP_NAME};

const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Registers the widget under the per-user Run key.
pub struct RegistryAutostart;

fn wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(once(0)).collect()
}

fn open_run_key(desired: REG_SAM_FLAGS) -> Result<HKEY, PlatformError> {
    let subkey = wide(RUN_KEY);
    let mut key = HKEY::default();
    let status = unsafe {
        RegOpenKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR::from_raw(subkey.as_ptr()),
            0,
            desired,
            &mut key,
        )
    };
    status
        .ok()
        .map_err(|e| PlatformError::Autostart(format!("failed to open Run key: {e}")))?;
    Ok(key)
}

fn close_key(key: HKEY) {
    let _ = unsafe { RegCloseKey(key) };
}

impl Autostart for RegistryAutostart {
    fn enable(&self) -> Result<(), PlatformError> {
        let exe = env::current_exe().map_err(|e| {
            PlatformError::Autostart(format!("cannot resolve own executable path: {e}"))
        })?;
        let value = wide(&exe.display().to_string());
        let name = wide(AUTOSTART_APP_NAME);

        let key = open_run_key(KEY_SET_VALUE)?;
        // REG_SZ data is the UTF-16 bytes including the terminator.
        let data =
            unsafe { std::slice::from_raw_parts(value.as_ptr().cast::<u8>(), value.len() * 2) };
        let status = unsafe {
            RegSetValueExW(key, PCWSTR::from_raw(name.as_ptr()), 0, REG_SZ, Some(data))
        };
        close_key(key);

        status
            .ok()
            .map_err(|e| PlatformError::Autostart(format!("failed to write Run value: {e}")))
    }

    fn disable(&self) -> Result<(), PlatformError> {
        let name = wide(AUTOSTART_APP_NAME);
        let key = open_run_key(KEY_SET_VALUE)?;
        let status = unsafe { RegDeleteValueW(key, PCWSTR::from_raw(name.as_ptr())) };
        close_key(key);

        if status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        status
            .ok()
            .map_err(|e| PlatformError::Autostart(format!("failed to remove Run value: {e}")))
    }

    fn status(&self) -> Result<bool, PlatformError> {
        let name = wide(AUTOSTART_APP_NAME);
        let key = open_run_key(KEY_QUERY_VALUE)?;
        let status = unsafe {
            RegQueryValueExW(key, PCWSTR::from_raw(name.as_ptr()), None, None, None, None)
        };
        close_key(key);

        if status == ERROR_FILE_NOT_FOUND {
            Ok(false)
        } else {
            status
                .ok()
                .map(|_| true)
                .map_err(|e| PlatformError::Autostart(format!("failed to query Run value: {e}")))
        }
    }
}
