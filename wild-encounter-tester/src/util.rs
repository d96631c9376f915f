use anyhow::{Result, bail, ensure};

use wild_encounter::PARTY_SIZE;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse seed tokens. Negative numbers fold to their magnitude; no tokens means the default seed.
pub fn parse_seeds(raw: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(raw) {
        if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else {
            bail!("Unrecognized seed token: {token}");
        }
    }
    seeds.dedup();
    if seeds.is_empty() {
        seeds.push(1337);
    }
    Ok(seeds)
}

/// Parse a comma-separated list of 1 to 6 party levels, each 1..=100.
pub fn parse_party_levels(raw: &str) -> Result<Vec<u8>> {
    let levels = split_csv(raw)
        .iter()
        .map(|token| {
            let level: u8 = token
                .parse()
                .map_err(|_| anyhow::anyhow!("Unrecognized party level: {token}"))?;
            ensure!((1..=100).contains(&level), "Party level {level} is outside 1..=100");
            Ok(level)
        })
        .collect::<Result<Vec<u8>>>()?;
    ensure!(
        (1..=PARTY_SIZE).contains(&levels.len()),
        "A party holds 1 to {PARTY_SIZE} members (got {})",
        levels.len()
    );
    Ok(levels)
}
