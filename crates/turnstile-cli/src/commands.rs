use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use turnstile_core::{
    decode_unverified, Claims, Clock, CredentialStore, GuardConfig, JarStore, MemoryStore,
    Navigator, RouteGuard, SystemClock, Verdict,
};

use crate::args::{Cli, Command, SessionAction};
use crate::exit_codes;

/// Applies redirects by announcing them; the shell has no router to call.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&mut self, path: &str) {
        println!("redirect: {path}");
    }
}

/// Where the credential comes from when not read out of the jar.
struct CredentialSource {
    token: Option<String>,
    token_file: Option<PathBuf>,
}

pub fn dispatch(cli: Cli) -> Result<i32> {
    let config = GuardConfig::from_env();
    let Cli {
        token,
        token_file,
        jar,
        command,
    } = cli;
    let jar = JarStore::new(jar_path(jar, &config)?);
    tracing::debug!(jar = %jar.path().display(), "using credential jar");
    let source = CredentialSource { token, token_file };

    match command {
        Command::Decode { json } => decode(&source, &jar, json),
        Command::Check { path } => check(&source, jar, &path, config),
        Command::Session { action } => session(jar, action),
    }
}

fn decode(source: &CredentialSource, jar: &JarStore, json: bool) -> Result<i32> {
    let Some(credential) = credential_from(source, jar)? else {
        eprintln!("no credential: pass --token/--token-file or store one with `turnstile session store`");
        return Ok(exit_codes::NO_SESSION);
    };
    let claims = match decode_unverified(&credential) {
        Ok(claims) => claims,
        Err(e) => {
            eprintln!("undecodable credential: {e}");
            return Ok(exit_codes::INTERNAL_ERROR);
        }
    };

    let fresh = claims.is_fresh(SystemClock.now_unix());
    if json {
        let mut value = serde_json::to_value(&claims).context("serializing claims")?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("expired".to_string(), serde_json::Value::Bool(!fresh));
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_claims(&claims, fresh);
    }

    Ok(if fresh {
        exit_codes::SUCCESS
    } else {
        exit_codes::NO_SESSION
    })
}

fn print_claims(claims: &Claims, fresh: bool) {
    println!("user:    {}", claims.user_id);
    println!("role:    {}", claims.role());
    if let Some(name) = &claims.name {
        println!("name:    {name}");
    }
    if let Some(email) = &claims.email {
        println!("email:   {email}");
    }
    println!("issued:  {}", render_ts(claims.iat));
    println!("expires: {}", render_ts(claims.exp));
    println!("status:  {}", if fresh { "fresh" } else { "expired" });
}

fn render_ts(unix: u64) -> String {
    let secs = i64::try_from(unix).unwrap_or(i64::MAX);
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{unix}"),
    }
}

fn check(source: &CredentialSource, jar: JarStore, path: &str, config: GuardConfig) -> Result<i32> {
    // An explicit token runs against a throwaway store, so a purge never
    // touches the jar the user did not name.
    if let Some(credential) = explicit_credential(source)? {
        run_check(MemoryStore::with_credential(credential), path, config)
    } else {
        run_check(jar, path, config)
    }
}

fn run_check<S: CredentialStore>(store: S, path: &str, config: GuardConfig) -> Result<i32> {
    let mut guard = RouteGuard::new(store, config);
    let verdict = guard.enforce(path, &mut StdoutNavigator);
    let code = match &verdict {
        Verdict::Authorized(claims) => {
            println!("verdict: authorized ({} as {})", claims.user_id, claims.role());
            exit_codes::SUCCESS
        }
        Verdict::Unauthorized { .. } => {
            println!("verdict: unauthorized");
            exit_codes::POLICY_DENIED
        }
        Verdict::Unauthenticated => {
            println!("verdict: unauthenticated");
            exit_codes::NO_SESSION
        }
        Verdict::Expired => {
            println!("verdict: expired");
            exit_codes::NO_SESSION
        }
    };
    Ok(code)
}

fn session(jar: JarStore, action: SessionAction) -> Result<i32> {
    match action {
        SessionAction::Store { credential } => {
            jar.persist(&credential)
                .with_context(|| format!("writing jar {}", jar.path().display()))?;
            println!("stored credential in {}", jar.path().display());
            Ok(exit_codes::SUCCESS)
        }
        SessionAction::Show => match jar.read() {
            Some(credential) => {
                println!("{credential}");
                Ok(exit_codes::SUCCESS)
            }
            None => {
                eprintln!("no credential stored in {}", jar.path().display());
                Ok(exit_codes::NO_SESSION)
            }
        },
        SessionAction::Clear => {
            jar.clear()
                .with_context(|| format!("clearing jar {}", jar.path().display()))?;
            println!("cleared {}", jar.path().display());
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// --token, then --token-file; `None` means fall back to the jar.
fn explicit_credential(source: &CredentialSource) -> Result<Option<String>> {
    if let Some(token) = &source.token {
        return Ok(Some(token.clone()));
    }
    if let Some(path) = &source.token_file {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading token file {}", path.display()))?;
        return Ok(Some(raw.trim().to_string()));
    }
    Ok(None)
}

fn credential_from(source: &CredentialSource, jar: &JarStore) -> Result<Option<String>> {
    if let Some(credential) = explicit_credential(source)? {
        return Ok(Some(credential));
    }
    Ok(jar.read())
}

fn jar_path(explicit: Option<PathBuf>, config: &GuardConfig) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let home = dirs::home_dir().context("cannot locate home directory; pass --jar")?;
    Ok(home.join(".turnstile").join(&config.credential_key))
}
