use nc_domain::config::{Config, ConfigSeverity, DoctorProfile, HardwareTransport};

/// Run all diagnostic checks and print a summary.
///
/// Returns `true` when every check passes, `false` when at least one failed.
pub fn run(config: &Config, config_path: &str) -> anyhow::Result<bool> {
    println!("nullclaw doctor");
    println!("===============\n");

    let mut all_passed = true;

    check_config_file(config_path, &mut all_passed);
    check_config_validation(config, &mut all_passed);
    check_workspace(config, &mut all_passed);
    check_hardware(config, &mut all_passed);

    println!();
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. Review the output above.");
    }

    Ok(all_passed)
}

// ── Individual checks ─────────────────────────────────────────────────

fn check_config_file(config_path: &str, all_passed: &mut bool) {
    let exists = std::path::Path::new(config_path).exists();
    print_check(
        "Config file exists",
        exists,
        if exists {
            config_path.to_owned()
        } else {
            format!("{config_path} not found (using defaults)")
        },
    );
    if !exists {
        *all_passed = false;
    }
}

fn check_config_validation(config: &Config, all_passed: &mut bool) {
    let issues = config.validate();
    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    if issues.is_empty() {
        print_check("Config validation", true, "no issues".into());
    } else {
        print_check(
            "Config validation",
            error_count == 0,
            format!("{} issue(s) ({error_count} error(s))", issues.len()),
        );
        for issue in &issues {
            println!("      {issue}");
        }
        if error_count > 0 {
            *all_passed = false;
        }
    }
}

fn check_workspace(config: &Config, all_passed: &mut bool) {
    let path = &config.workspace.path;
    let exists = path.exists();
    let writable = if exists {
        let probe = path.join(".nullclaw_doctor_probe");
        let w = std::fs::write(&probe, b"probe").is_ok();
        let _ = std::fs::remove_file(&probe);
        w
    } else {
        false
    };

    let ok = exists && writable;
    let detail = match (exists, writable) {
        (true, true) => format!("{} (writable)", path.display()),
        (true, false) => format!("{} (not writable)", path.display()),
        _ => format!("{} (does not exist)", path.display()),
    };

    print_check("Workspace directory", ok, detail);
    if !ok {
        *all_passed = false;
    }
}

/// Hardware readiness is gated by `doctor.profile`: `software_only` (the
/// default) suppresses the check entirely since this core never probes
/// hardware itself — that's an external collaborator's job (§6/§9).
fn check_hardware(config: &Config, all_passed: &mut bool) {
    match config.doctor.profile {
        DoctorProfile::SoftwareOnly => {
            print_check(
                "Hardware readiness",
                true,
                "suppressed (doctor.profile = software_only)".into(),
            );
        }
        DoctorProfile::Full => {
            let ok = !config.hardware.enabled || config.hardware.transport != HardwareTransport::None;
            let detail = if !config.hardware.enabled {
                "hardware.enabled = false".into()
            } else {
                format!("transport = {:?}", config.hardware.transport)
            };
            print_check("Hardware readiness", ok, detail);
            if !ok {
                *all_passed = false;
            }
        }
    }
}

// ── Formatting helper ─────────────────────────────────────────────────

fn print_check(name: &str, passed: bool, detail: String) {
    let status = if passed { "PASS" } else { "FAIL" };
    println!("  [{status}] {name}: {detail}");
}
