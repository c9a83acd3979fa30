//! Configuration management: profiles, defaults, and token storage.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Password};

use accessly_config::{
    Config, Profile, config_path, load_config_or_default, save_config, store_token,
};
use accessly_core::api::DEFAULT_PORT;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Validation {
        field: "input".into(),
        reason: e.to_string(),
    }
}

fn require_terminal(action: &str) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::ConfirmationRequired {
            action: action.to_owned(),
        })
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Profiles => profiles(),
        ConfigCommand::Use { name } => use_profile(&name),
        ConfigCommand::SetToken { profile } => set_token(profile.as_deref(), global),
    }
}

// ── init ────────────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    require_terminal("config init").map_err(|_| CliError::Validation {
        field: "terminal".into(),
        reason: "config init is interactive; edit the config file directly in scripts".into(),
    })?;

    let mut cfg = load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let host: String = Input::new()
        .with_prompt("Controller host or IP")
        .interact_text()
        .map_err(prompt_err)?;

    let port: u16 = Input::new()
        .with_prompt("API port")
        .default(DEFAULT_PORT)
        .interact_text()
        .map_err(prompt_err)?;

    let token: String = Password::new()
        .with_prompt("API token")
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        host,
        port,
        token: None,
        token_env: None,
        verify_tls: None,
        timeout: None,
        max_retries: None,
    };

    // Prefer the keyring; fall back to plaintext with a warning.
    if let Err(e) = store_token(&name, &token) {
        eprintln!("keyring unavailable ({e}); storing the token in the config file");
        profile.token = Some(token);
    }

    let make_default = cfg.profiles.is_empty()
        || Confirm::new()
            .with_prompt(format!("Make '{name}' the default profile?"))
            .default(true)
            .interact()
            .map_err(prompt_err)?;

    cfg.profiles.insert(name.clone(), profile);
    if make_default {
        cfg.default_profile = Some(name.clone());
    }

    save_config(&cfg)?;

    if !global.quiet {
        eprintln!(
            "profile '{name}' written to {}",
            config_path().display()
        );
    }
    Ok(())
}

// ── show / profiles / use ───────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let active = crate::config::active_profile_name(global, &cfg);

    println!("config file:     {}", config_path().display());
    println!("active profile:  {active}");

    match cfg.profiles.get(&active) {
        Some(profile) => {
            println!("host:            {}", profile.host);
            println!("port:            {}", profile.port);
            println!(
                "token:           {}",
                if profile.token.is_some() {
                    "(plaintext in config)"
                } else {
                    "(keyring or env)"
                }
            );
            println!(
                "verify TLS:      {}",
                profile.verify_tls.unwrap_or(false)
            );
        }
        None => println!("(profile not configured -- using flags/env only)"),
    }
    Ok(())
}

fn profiles() -> Result<(), CliError> {
    let cfg = load_config_or_default();

    if cfg.profiles.is_empty() {
        println!("no profiles configured; run: accessly config init");
        return Ok(());
    }

    let default = cfg.default_profile.as_deref().unwrap_or("");
    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort();

    for name in names {
        let marker = if name == default { "*" } else { " " };
        let host = cfg
            .profiles
            .get(name)
            .map(|p| p.host.as_str())
            .unwrap_or("");
        println!("{marker} {name}  ({host})");
    }
    Ok(())
}

fn use_profile(name: &str) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();

    if !cfg.profiles.contains_key(name) {
        return Err(CliError::ProfileNotFound { name: name.into() });
    }

    cfg.default_profile = Some(name.to_owned());
    save_config(&cfg)?;
    eprintln!("default profile set to '{name}'");
    Ok(())
}

// ── set-token ───────────────────────────────────────────────────────

fn set_token(profile: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    require_terminal("config set-token")?;

    let cfg = load_config_or_default();
    let name = profile
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| crate::config::active_profile_name(global, &cfg));

    let token: String = Password::new()
        .with_prompt(format!("API token for profile '{name}'"))
        .interact()
        .map_err(prompt_err)?;

    store_token(&name, &token)?;
    eprintln!("token stored in the system keyring for '{name}'");
    Ok(())
}
