//! Subscribe and unsubscribe command implementation

use std::path::Path;
use std::process::ExitCode;

use console::Style;

use super::helpers::{self, Services};
use crate::cli::{ReconcileArgs, SubscribeArgs};
use crate::domain::{
    DeploymentOutcome, HostOutcome, Mode, ReconcileResult, RequestSpec, TargetHost, TargetScope,
};
use crate::error::{Result, catalog, config as config_error};

/// Run subscribe command
pub fn run_subscribe(config_path: Option<&Path>, args: SubscribeArgs) -> Result<ExitCode> {
    run(config_path, args.common, Mode::Subscribe, args.cache)
}

/// Run unsubscribe command
pub fn run_unsubscribe(config_path: Option<&Path>, args: ReconcileArgs) -> Result<ExitCode> {
    run(config_path, args, Mode::Unsubscribe, false)
}

fn run(
    config_path: Option<&Path>,
    args: ReconcileArgs,
    mode: Mode,
    cache_locally: bool,
) -> Result<ExitCode> {
    let request = build_request(&args, mode, cache_locally)?;
    let services = Services::load(config_path)?;

    let progress = helpers::progress(args.json);
    let prompt = helpers::prompt(&args.auth, Some(&progress));
    let outcome = services
        .engine(prompt.as_ref())
        .with_progress(&progress)
        .reconcile(&request);
    if outcome.success {
        progress.finish();
    } else {
        progress.abandon();
    }

    if args.json {
        helpers::print_json(&outcome)?;
    } else {
        print_outcome(&request, &outcome);
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_request(args: &ReconcileArgs, mode: Mode, cache_locally: bool) -> Result<RequestSpec> {
    let scope = match (&args.scope.host, &args.scope.group) {
        (Some(host), None) => TargetScope::Host(TargetHost::new(host.trim())),
        (None, Some(group)) => TargetScope::Group(group.clone()),
        _ => {
            return Err(config_error::invalid(
                "exactly one of --host or --group is required",
            ));
        }
    };

    Ok(RequestSpec {
        subscription: args.name.clone(),
        scope,
        credentials: helpers::credentials(&args.auth)?,
        mode,
        cache_locally,
        delivery_group: args.scope.delivery_group.clone(),
        dry_run: args.dry_run,
    })
}

fn print_outcome(request: &RequestSpec, outcome: &DeploymentOutcome) {
    let red = Style::new().red().bold();

    if let Some(error) = &outcome.error {
        println!("{} {}", red.apply_to("✗"), error);
        return;
    }

    for host in &outcome.hosts {
        print_host(host);
    }

    let succeeded = outcome.hosts.iter().filter(|h| h.succeeded()).count();
    let verb = match request.mode {
        Mode::Subscribe => "Subscribed",
        Mode::Unsubscribe => "Unsubscribed",
    };
    let summary = format!(
        "{verb} '{}' on {succeeded}/{} host(s)",
        request.subscription,
        outcome.hosts.len()
    );
    println!();
    if outcome.success {
        println!("{}", Style::new().green().bold().apply_to(summary));
    } else {
        println!("{}", red.apply_to(summary));
    }
}

fn print_host(host: &HostOutcome) {
    let bold = Style::new().bold();

    if let Some(failure) = &host.stage_failure {
        println!(
            "{} {} {} failed: {}",
            Style::new().red().bold().apply_to("✗"),
            bold.apply_to(&host.host),
            failure.stage,
            failure.error
        );
        return;
    }

    let Some(result) = &host.result else {
        return;
    };
    let mark = if result.success {
        Style::new().green().bold().apply_to("✓")
    } else {
        Style::new().yellow().bold().apply_to("!")
    };
    let dry_run = if result.dry_run { " (dry run)" } else { "" };
    println!("{mark} {}{dry_run}", bold.apply_to(&host.host));
    print_result(result);
}

fn print_result(result: &ReconcileResult) {
    let dim = Style::new().dim();
    let lines = [
        ("installed", &result.installed),
        ("removed", &result.removed),
        ("published", &result.published),
        ("already published", &result.already_published),
        ("unpublished", &result.unpublished),
        ("already absent", &result.already_absent),
    ];
    for (label, names) in lines {
        if !names.is_empty() {
            println!("    {} {}", dim.apply_to(format!("{label}:")), names.join(", "));
        }
    }

    for failure in &result.publish_failures {
        let err = catalog::publish_failed(&failure.name, &failure.reason);
        println!("    {}", Style::new().red().apply_to(err));
    }
    for failure in &result.unpublish_failures {
        println!(
            "    {} {}: {}",
            Style::new().yellow().apply_to("could not unpublish"),
            failure.name,
            failure.reason
        );
    }
    if let Some(error) = &result.cache_warm_error {
        println!("    {} {error}", Style::new().yellow().apply_to("cache warm:"));
    }
    if result.catalog_skipped {
        println!(
            "    {}",
            dim.apply_to("catalog: skipped (no --delivery-group)")
        );
    }
}
