//! Name translation utilities.
//!
//! Stack configuration keys arrive in camelCase (the form posts them that
//! way) and leave as upper-snake environment variable names for the
//! `itzg/minecraft-server` image. Stack names typed by humans are reduced to
//! a filesystem/identifier-safe form before being handed to Portainer.

/// Translate a camelCase configuration key into its environment variable
/// name: an underscore is inserted before every uppercase letter (except a
/// leading one) and the whole result is uppercased.
///
/// `allowNether` becomes `ALLOW_NETHER`, `pvp` becomes `PVP`.
pub fn env_var_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

/// Derive a safe stack name from a human-entered one: characters outside
/// `[a-zA-Z0-9-_ ]` are stripped, then runs of spaces collapse to single
/// underscores. The result doubles as the Portainer stack name and the data
/// directory segment on disk.
pub fn safe_stack_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ' ')) {
            continue;
        }
        if ch == ' ' {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            in_space = false;
            out.push(ch);
        }
    }
    out
}
