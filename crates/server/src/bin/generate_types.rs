use std::{env, fs, path::PathBuf};

use anyhow::Context;

use db::models::{
    contribution::{Contribution, ContributionStatus, CreateContribution},
    finance_entry::{CreateFinanceEntry, EntryKind, FinanceEntry},
    legal_document::{CaseStatus, CreateLegalDocument, LegalDocument},
    member::{CreateMember, Member, MemberStatus},
    partner_agreement::{AgreementStatus, CreatePartnerAgreement, PartnerAgreement},
    service_ticket::{CreateServiceTicket, ServiceTicket},
    table::{SortDirection, Table},
};
use server::response::ApiResponse;
use services::services::{
    dashboard::{ActivityItem, Dashboard, QuickAction, StatCard, Trend},
    session::Identity,
};
use ts_rs::TS;

fn generate_types_content() -> String {
    const HEADER: &str = "// This file was generated by `cargo run --bin generate-types`. Do not edit by hand.\n\n";

    let decls: Vec<String> = vec![
        Table::decl(),
        SortDirection::decl(),
        MemberStatus::decl(),
        Member::decl(),
        CreateMember::decl(),
        ContributionStatus::decl(),
        Contribution::decl(),
        CreateContribution::decl(),
        EntryKind::decl(),
        FinanceEntry::decl(),
        CreateFinanceEntry::decl(),
        AgreementStatus::decl(),
        PartnerAgreement::decl(),
        CreatePartnerAgreement::decl(),
        CaseStatus::decl(),
        LegalDocument::decl(),
        CreateLegalDocument::decl(),
        ServiceTicket::decl(),
        CreateServiceTicket::decl(),
        Identity::decl(),
        Trend::decl(),
        StatCard::decl(),
        ActivityItem::decl(),
        QuickAction::decl(),
        Dashboard::decl(),
        ApiResponse::<()>::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|d| {
            let trimmed = d.trim_start();
            if trimmed.starts_with("export") {
                d
            } else {
                format!("export {trimmed}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{HEADER}{body}\n")
}

fn main() -> anyhow::Result<()> {
    let check_mode = env::args().any(|arg| arg == "--check");
    let out_dir = PathBuf::from(env::var("AMA_TYPES_DIR").unwrap_or_else(|_| "shared".to_string()));
    let out_path = out_dir.join("types.ts");

    let generated = generate_types_content();

    if check_mode {
        let current = fs::read_to_string(&out_path).unwrap_or_default();
        if current != generated {
            anyhow::bail!(
                "{} is not up to date; run 'cargo run --bin generate-types' and commit the changes",
                out_path.display()
            );
        }
        println!("{} is up to date.", out_path.display());
        return Ok(());
    }

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    fs::write(&out_path, generated)
        .with_context(|| format!("unable to write {}", out_path.display()))?;
    println!("TypeScript types written to {}", out_path.display());
    Ok(())
}
