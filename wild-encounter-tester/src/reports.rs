use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::simulation::ScenarioResult;

/// How many of the most common species the console report lists per run.
const TOP_SPECIES: usize = 5;

pub fn write_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Encounter Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===============================".cyan())?;

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();
    let failed_runs = total_runs - passed_runs;

    writeln!(out, "Total runs: {total_runs}")?;
    writeln!(out, "Passed: {}", passed_runs.to_string().green())?;
    writeln!(out, "Failed: {}", failed_runs.to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} (seed {})",
            result.scenario.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Encounters: {}/{} ({:.1}%)",
            result.encounters,
            result.attempts,
            result.encounter_percent()
        )?;
        if !result.battles.is_empty() {
            let kinds: Vec<String> = result
                .battles
                .iter()
                .map(|(kind, count)| format!("{kind} x{count}"))
                .collect();
            writeln!(out, "   Battles: {}", kinds.join(", "))?;
        }
        if let (Some(low), Some(high)) = (result.levels.keys().next(), result.levels.keys().last()) {
            writeln!(out, "   Levels: {low}..={high}")?;
        }
        if result.surfing_encounters > 0 {
            writeln!(out, "   Surfing encounters: {}", result.surfing_encounters)?;
        }

        let mut species: Vec<(&String, &u32)> = result.species.iter().collect();
        species.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (name, count) in species.into_iter().take(TOP_SPECIES) {
            writeln!(out, "     {name:<22} {count}")?;
        }
        writeln!(out, "   Draws: {}  Time: {:?}", result.draws, result.duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario: "land".to_string(),
            seed: 42,
            attempts: 10,
            encounters: 2,
            battles: BTreeMap::from([("Wild".to_string(), 2)]),
            species: BTreeMap::from([("ZIGZAGOON".to_string(), 1), ("WURMPLE".to_string(), 1)]),
            levels: BTreeMap::from([(14, 1), (17, 1)]),
            surfing_encounters: 0,
            draws: 31,
            duration: Duration::from_millis(3),
            passed,
            failures: if passed {
                Vec::new()
            } else {
                vec!["attempt 3: level 40 outside 14..=17".to_string()]
            },
        }
    }

    #[test]
    fn console_report_lists_runs_and_failures() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_console_report(&mut out, &[sample(true), sample(false)], Duration::from_secs(1)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total runs: 2"));
        assert!(text.contains("Encounters: 2/10 (20.0%)"));
        assert!(text.contains("Levels: 14..=17"));
        assert!(text.contains("level 40 outside"));
    }

    #[test]
    fn json_report_is_an_array_of_runs() {
        let mut out = Vec::new();
        write_json_report(&mut out, &[sample(true)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["scenario"], "land");
        assert_eq!(value[0]["battles"]["Wild"], 2);
        assert_eq!(value[0]["passed"], true);
    }
}
