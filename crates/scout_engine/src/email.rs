use std::sync::LazyLock;

use regex::Regex;

static ADDRESS_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,63}$").expect("address pattern")
});

/// Providers whose misspellings are overwhelmingly typos, not real domains.
const WELL_KNOWN_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "live.com",
    "protonmail.com",
];

const DISPOSABLE_DOMAINS: &[&str] = &[
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "yopmail.com",
    "tempmail.com",
    "trashmail.com",
    "sharklasers.com",
    "getnada.com",
    "dispostable.com",
    "maildrop.cc",
];

/// Decides whether a candidate address is worth reporting.
///
/// This is a collaborator contract: the page extractor asks, the
/// implementation owns the acceptance thresholds.
#[async_trait::async_trait]
pub trait EmailValidator: Send + Sync {
    async fn validate(&self, address: &str) -> bool;
}

/// Default validator: syntax, typo-likelihood against well-known mail
/// providers, disposable-domain rejection, and mail-domain resolvability.
///
/// The resolvability check stands in for an MX lookup; disable `verify_mx`
/// to keep validation fully offline.
#[derive(Debug, Clone)]
pub struct DeliverabilityValidator {
    pub verify_mx: bool,
}

impl Default for DeliverabilityValidator {
    fn default() -> Self {
        Self { verify_mx: true }
    }
}

#[async_trait::async_trait]
impl EmailValidator for DeliverabilityValidator {
    async fn validate(&self, address: &str) -> bool {
        if !ADDRESS_SYNTAX.is_match(address) {
            return false;
        }
        let Some((_, domain)) = address.rsplit_once('@') else {
            return false;
        };
        let domain = domain.to_ascii_lowercase();

        if looks_like_provider_typo(&domain) {
            log::debug!("rejecting {address}: near-miss of a well-known domain");
            return false;
        }
        if DISPOSABLE_DOMAINS.contains(&domain.as_str()) {
            log::debug!("rejecting {address}: disposable domain");
            return false;
        }
        if self.verify_mx && !mail_domain_resolves(&domain).await {
            log::debug!("rejecting {address}: mail domain does not resolve");
            return false;
        }
        true
    }
}

fn looks_like_provider_typo(domain: &str) -> bool {
    WELL_KNOWN_DOMAINS
        .iter()
        .any(|known| *known != domain && near_miss(domain, known))
}

async fn mail_domain_resolves(domain: &str) -> bool {
    // Port 25 is only there to satisfy the resolver API; no connection is made.
    match tokio::net::lookup_host((domain, 25)).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(_) => false,
    }
}

/// True when `a` and `b` differ by at most one edit (substitution,
/// insertion, deletion) or a single adjacent transposition.
fn near_miss(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let (short, long) = (short.as_bytes(), long.as_bytes());

    match long.len() - short.len() {
        0 => {
            let diffs: Vec<usize> = (0..short.len()).filter(|&i| short[i] != long[i]).collect();
            match diffs[..] {
                [] | [_] => true,
                [i, j] => j == i + 1 && short[i] == long[j] && short[j] == long[i],
                _ => false,
            }
        }
        1 => {
            let mut i = 0;
            while i < short.len() && short[i] == long[i] {
                i += 1;
            }
            short[i..] == long[i + 1..]
        }
        _ => false,
    }
}
