// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy `./memchat.toml` > `~/.config/memchat/memchat.toml`
//! > `/etc/memchat/memchat.toml`, `MEMCHAT_*` overrides, and the provider-native
//! variables (`OPENAI_API_KEY`, `OPENAI_MODEL`, `ZEP_API_KEY`, `ZEP_USER_ID`,
//! `ZEP_THREAD_ID`, `ZEP_SESSION_ID`).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MemchatConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/memchat/memchat.toml`
/// 3. `~/.config/memchat/memchat.toml`
/// 4. `./memchat.toml`
/// 5. `MEMCHAT_*` environment variables
/// 6. Provider-native environment variables
pub fn load_config() -> Result<MemchatConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MemchatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MemchatConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MemchatConfig, figment::Error> {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(MemchatConfig::default()))
            .merge(Toml::file(path)),
    )
    .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(MemchatConfig::default()))
            .merge(Toml::file("/etc/memchat/memchat.toml"))
            .merge(Toml::file(
                dirs::config_dir()
                    .map(|d| d.join("memchat/memchat.toml"))
                    .unwrap_or_default(),
            ))
            .merge(Toml::file("memchat.toml")),
    )
}

fn with_env(figment: Figment) -> Figment {
    figment
        .merge(prefixed_env())
        .merge(native_env(&["ZEP_SESSION_ID"]))
        .merge(native_env(&[
            "OPENAI_API_KEY",
            "OPENAI_MODEL",
            "ZEP_API_KEY",
            "ZEP_USER_ID",
            "ZEP_THREAD_ID",
        ]))
}

/// `MEMCHAT_<SECTION>_<KEY>` variables.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `MEMCHAT_ZEP_MAX_MESSAGE_CHARS` maps to `zep.max_message_chars`.
fn prefixed_env() -> Env {
    Env::prefixed("MEMCHAT_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("zep_", "zep.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

/// The un-prefixed variables the hosted SDKs conventionally read.
///
/// `ZEP_SESSION_ID` is the older name for `ZEP_THREAD_ID`; it is merged in a
/// separate, earlier provider so the newer name wins when both are set.
fn native_env(names: &'static [&'static str]) -> Env {
    Env::raw().only(names).map(|key| {
        let mapped = match key.as_str().to_ascii_lowercase().as_str() {
            "openai_api_key" => "openai.api_key",
            "openai_model" => "openai.model",
            "zep_api_key" => "zep.api_key",
            "zep_user_id" => "zep.user_id",
            "zep_thread_id" | "zep_session_id" => "zep.thread_id",
            other => return other.to_string().into(),
        };
        mapped.to_string().into()
    })
}
