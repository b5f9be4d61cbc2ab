//! CLEARSIGHT — Vision-Care Claims Demo CLI
//!
//! Runs one or all of the four workflow scenarios. Each scenario wires real
//! CLEARSIGHT components (role/identity directories, prescription registry,
//! claims engine, hash-chained ledgers) and narrates the outcomes.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- happy-path
//!   cargo run -p demo -- unlicensed-optometrist
//!   cargo run -p demo -- expired-prescription
//!   cargo run -p demo -- manufacturing-gate

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clearsight_claims::{AdjudicationConfig, ClaimsEngine, PolicyRequest};
use clearsight_contracts::{
    claim::ClaimDecision,
    error::ClearsightResult,
    identity::{Address, PatientId, Role},
    policy::{CoverageTerms, ValidityWindow},
    prescription::{GlassesRecord, LensParameters},
    time::Timestamp,
};
use clearsight_core::traits::RoleRegistry;
use clearsight_directory::{IdentityDirectory, ManufacturingDirectory, RoleDirectory};
use clearsight_ledger::InMemoryLedger;
use clearsight_registry::{PrescriptionRegistry, PrescriptionRequest};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CLEARSIGHT — vision-care insurance claims workflow demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "CLEARSIGHT vision-care claims workflow demo",
    long_about = "Runs CLEARSIGHT workflow scenarios showing optometrist licensure,\n\
                  prescription expiry, claim adjudication, and ledger integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Register, issue, insure, file, approve — then watch reprocessing fail.
    HappyPath,
    /// Issuance is refused until the optometrist registers.
    UnlicensedOptometrist,
    /// Filing against an expired prescription is refused.
    ExpiredPrescription,
    /// Approval is blocked until glasses are dispensed.
    ManufacturingGate,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::HappyPath => run_happy_path(),
        Command::UnlicensedOptometrist => run_unlicensed_optometrist(),
        Command::ExpiredPrescription => run_expired_prescription(),
        Command::ManufacturingGate => run_manufacturing_gate(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> ClearsightResult<()> {
    run_happy_path()?;
    run_unlicensed_optometrist()?;
    run_expired_prescription()?;
    run_manufacturing_gate()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("CLEARSIGHT — Vision-Care Claims Workflow");
    println!("========================================");
    println!();
    println!("Adjudication pipeline per claim:");
    println!("  [1] Policy must exist, be active, and cover the filing timestamp");
    println!("  [2] Prescription must be unexpired at filing time (expiry exclusive)");
    println!("  [3] Caller must be the patient's principal or a delegated agent");
    println!("  [4] Insurer rules on the filed claim exactly once — terminal thereafter");
    println!("  [5] Every mutation lands on a SHA-256 hash-chained ledger");
    println!();
}

// ── Shared wiring ─────────────────────────────────────────────────────────────

/// One fully wired deployment: directories, registry, engine, two ledgers.
struct Deployment {
    registry: Arc<PrescriptionRegistry>,
    engine: ClaimsEngine,
    roles: Arc<RoleDirectory>,
    identity: Arc<IdentityDirectory>,
    manufacturing: Arc<ManufacturingDirectory>,
    rx_ledger: Arc<InMemoryLedger>,
    claims_ledger: Arc<InMemoryLedger>,
}

fn wire(config: AdjudicationConfig) -> Deployment {
    let roles = Arc::new(RoleDirectory::new());
    let identity = Arc::new(IdentityDirectory::new());
    let manufacturing = Arc::new(ManufacturingDirectory::new());
    let rx_ledger = Arc::new(InMemoryLedger::new("prescriptions"));
    let claims_ledger = Arc::new(InMemoryLedger::new("claims"));

    let registry = Arc::new(PrescriptionRegistry::new(roles.clone(), rx_ledger.clone()));
    let engine = ClaimsEngine::new(
        config,
        roles.clone(),
        identity.clone(),
        registry.clone(),
        manufacturing.clone(),
        claims_ledger.clone(),
    );

    Deployment {
        registry,
        engine,
        roles,
        identity,
        manufacturing,
        rx_ledger,
        claims_ledger,
    }
}

fn standard_lenses() -> LensParameters {
    LensParameters {
        sphere_right: -150,
        cylinder_right: -75,
        axis_right: 90,
        sphere_left: -125,
        cylinder_left: -50,
        axis_left: 85,
        add_power: 0,
        pd: 630,
    }
}

fn report_ledgers(d: &Deployment) {
    println!(
        "  Ledgers: prescriptions={} entries (intact: {}), claims={} entries (intact: {})",
        d.rx_ledger.len(),
        d.rx_ledger.verify_integrity(),
        d.claims_ledger.len(),
        d.claims_ledger.verify_integrity(),
    );
    println!();
}

// ── Scenario 1: happy path ────────────────────────────────────────────────────

fn run_happy_path() -> ClearsightResult<()> {
    println!("=== Scenario 1: Happy Path ===");
    println!();

    let d = wire(AdjudicationConfig::default());

    let optometrist = Address::new("SP1OPTOMETRIST");
    let insurer = Address::new("SP1INSURER");
    let patient = Address::new("SP1PATIENT");

    d.registry.register_optometrist(optometrist.clone())?;
    d.roles.grant(insurer.clone(), Role::Insurer);
    d.identity.register_patient(PatientId(1), patient.clone());

    let rx1 = d.registry.issue_prescription(
        &optometrist,
        PrescriptionRequest {
            patient_id: PatientId(1),
            lenses: standard_lenses(),
            issued_at: Timestamp(10),
            expires_at: Timestamp(50),
        },
    )?;
    println!("  Prescription {} issued (valid t10..t50, expiry exclusive)", rx1);

    let policy1 = d.engine.create_policy(
        &insurer,
        PolicyRequest {
            patient_id: PatientId(1),
            insurer: insurer.clone(),
            terms: CoverageTerms { limit: 300, reimbursement_percent: 80 },
            window: ValidityWindow { starts_at: Timestamp(0), ends_at: Timestamp(1000) },
        },
    )?;
    println!("  Policy {} created (limit 300)", policy1);

    let claim1 = d.engine.file_claim(&patient, policy1, rx1, 200, Timestamp(30))?;
    println!("  Claim {} filed at t30 for 200 → status: filed", claim1);

    let approved = d
        .engine
        .process_claim(&insurer, claim1, ClaimDecision::Approve { amount: 150 })?;
    println!(
        "  Insurer approved {} for {} → status: {}",
        claim1,
        approved.amount_approved.unwrap_or(0),
        approved.status
    );

    // The claim is terminal: any further ruling is refused.
    match d.engine.process_claim(&insurer, claim1, ClaimDecision::Reject) {
        Err(e) => println!("  Reprocessing refused as expected: {}", e),
        Ok(_) => println!("  UNEXPECTED: reprocessing succeeded"),
    }

    report_ledgers(&d);
    Ok(())
}

// ── Scenario 2: unlicensed optometrist ────────────────────────────────────────

fn run_unlicensed_optometrist() -> ClearsightResult<()> {
    println!("=== Scenario 2: Unlicensed Optometrist ===");
    println!();

    let d = wire(AdjudicationConfig::default());
    let optometrist = Address::new("SP2NEWOPT");

    let request = PrescriptionRequest {
        patient_id: PatientId(2),
        lenses: standard_lenses(),
        issued_at: Timestamp(10),
        expires_at: Timestamp(50),
    };

    match d.registry.issue_prescription(&optometrist, request.clone()) {
        Err(e) => println!("  Issuance refused before registration: {}", e),
        Ok(_) => println!("  UNEXPECTED: unlicensed issuance succeeded"),
    }

    d.registry.register_optometrist(optometrist.clone())?;
    println!("  Optometrist {} registered", optometrist);

    let id = d.registry.issue_prescription(&optometrist, request)?;
    println!("  Identical call now succeeds → {}", id);

    report_ledgers(&d);
    Ok(())
}

// ── Scenario 3: expired prescription ──────────────────────────────────────────

fn run_expired_prescription() -> ClearsightResult<()> {
    println!("=== Scenario 3: Expired Prescription ===");
    println!();

    let d = wire(AdjudicationConfig::default());

    let optometrist = Address::new("SP3OPT");
    let insurer = Address::new("SP3INS");
    let patient = Address::new("SP3PAT");

    d.registry.register_optometrist(optometrist.clone())?;
    d.roles.grant(insurer.clone(), Role::Insurer);
    d.identity.register_patient(PatientId(3), patient.clone());

    let rx = d.registry.issue_prescription(
        &optometrist,
        PrescriptionRequest {
            patient_id: PatientId(3),
            lenses: standard_lenses(),
            issued_at: Timestamp(10),
            expires_at: Timestamp(50),
        },
    )?;

    let policy = d.engine.create_policy(
        &insurer,
        PolicyRequest {
            patient_id: PatientId(3),
            insurer: insurer.clone(),
            terms: CoverageTerms { limit: 300, reimbursement_percent: 80 },
            window: ValidityWindow { starts_at: Timestamp(0), ends_at: Timestamp(1000) },
        },
    )?;

    println!("  Prescription {} valid t10..t50; filing at t60:", rx);
    match d.engine.file_claim(&patient, policy, rx, 200, Timestamp(60)) {
        Err(e) => println!("  Filing refused as expected: {}", e),
        Ok(_) => println!("  UNEXPECTED: filing succeeded after expiry"),
    }

    // At exactly t50 the prescription is already invalid: expiry is exclusive.
    println!(
        "  is_prescription_valid at t49: {}, at t50: {}",
        d.registry.is_prescription_valid(rx, Timestamp(49)),
        d.registry.is_prescription_valid(rx, Timestamp(50)),
    );

    report_ledgers(&d);
    Ok(())
}

// ── Scenario 4: manufacturing gate ────────────────────────────────────────────

fn run_manufacturing_gate() -> ClearsightResult<()> {
    println!("=== Scenario 4: Manufacturing Gate ===");
    println!();

    let d = wire(AdjudicationConfig {
        require_manufacturing_record: true,
        ..AdjudicationConfig::default()
    });

    let optometrist = Address::new("SP4OPT");
    let insurer = Address::new("SP4INS");
    let patient = Address::new("SP4PAT");

    d.registry.register_optometrist(optometrist.clone())?;
    d.roles.grant(insurer.clone(), Role::Insurer);
    d.identity.register_patient(PatientId(4), patient.clone());

    let rx = d.registry.issue_prescription(
        &optometrist,
        PrescriptionRequest {
            patient_id: PatientId(4),
            lenses: standard_lenses(),
            issued_at: Timestamp(10),
            expires_at: Timestamp(100),
        },
    )?;

    let policy = d.engine.create_policy(
        &insurer,
        PolicyRequest {
            patient_id: PatientId(4),
            insurer: insurer.clone(),
            terms: CoverageTerms { limit: 300, reimbursement_percent: 80 },
            window: ValidityWindow { starts_at: Timestamp(0), ends_at: Timestamp(1000) },
        },
    )?;

    let claim = d.engine.file_claim(&patient, policy, rx, 250, Timestamp(20))?;
    println!("  Claim {} filed; manufacturing record required for approval", claim);

    match d
        .engine
        .process_claim(&insurer, claim, ClaimDecision::Approve { amount: 250 })
    {
        Err(e) => println!("  Approval blocked as expected: {}", e),
        Ok(_) => println!("  UNEXPECTED: approval without dispensed glasses"),
    }

    d.manufacturing.record_dispensed(GlassesRecord {
        prescription_id: rx,
        manufacturer: Address::new("SP4LENSWORKS"),
        lens_batch: "B-2231".to_string(),
        dispensed_at: Timestamp(15),
    });
    println!("  Glasses dispensed (batch B-2231); retrying approval:");

    let approved = d
        .engine
        .process_claim(&insurer, claim, ClaimDecision::Approve { amount: 250 })?;
    println!("  Claim {} → status: {}", claim, approved.status);

    report_ledgers(&d);
    Ok(())
}
