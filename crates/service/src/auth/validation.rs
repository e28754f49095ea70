//! Input rules applied before anything is hashed or stored.
//!
//! The email grammar accepts UTF-8 local parts, quoted local parts and IDN or
//! punycode top-level domains; lengths are measured in bytes.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_LABEL_CHARS: usize = 63;

/// One dot-separated piece of an unquoted local part.
static LOCAL_ATOM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~\-\u{A1}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}]+$")
        .expect("local atom pattern compiles")
});

/// Body of a quoted local part: printable or escaped characters, spaces allowed.
static QUOTED_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[\s\x01-\x08\x0B\x0C\x0E-\x1F\x7F\x21\x23-\x5B\x5D-\x7E\u{A0}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}]|\\[\x01-\x09\x0B\x0C\x0D-\x7F\u{A0}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}])*$",
    )
    .expect("quoted local pattern compiles")
});

static DOMAIN_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9\-\u{A1}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}]+$")
        .expect("domain label pattern compiles")
});

static TLD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z\u{A1}-\u{A8}\u{AA}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}]{2,}|[Xx][Nn][A-Za-z0-9\-]{2,})$")
        .expect("tld pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) if local.len() <= MAX_LOCAL_PART_LEN => {
            is_valid_local_part(local) && is_valid_domain(domain)
        }
        _ => false,
    }
}

fn is_valid_local_part(local: &str) -> bool {
    if local.len() >= 2 && local.starts_with('"') && local.ends_with('"') {
        return QUOTED_LOCAL_RE.is_match(&local[1..local.len() - 1]);
    }
    local.split('.').all(|atom| LOCAL_ATOM_RE.is_match(atom))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, _)) = labels.split_last() else {
        return false;
    };
    if labels.len() < 2 || !TLD_RE.is_match(tld) {
        return false;
    }
    labels.iter().all(|label| {
        DOMAIN_LABEL_RE.is_match(label)
            && label.chars().count() <= MAX_LABEL_CHARS
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

/// Length is counted in UTF-16 code units, so an astral character such as an
/// emoji counts twice.
pub fn is_strong_password(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LEN
}
