//! Supplier commands
//!
//! Commands: list, show, add, update

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use invctl_core::models::{NewSupplier, Supplier, SupplierUpdate};
use invctl_db::store;

#[derive(Parser, Debug)]
pub struct SupplierArgs {
    #[command(subcommand)]
    pub command: SupplierCommands,
}

#[derive(Subcommand, Debug)]
pub enum SupplierCommands {
    /// List active suppliers (--all includes inactive)
    List(ListArgs),
    /// Show a supplier by id
    Show(ShowArgs),
    /// Add a supplier
    Add(AddArgs),
    /// Update supplier fields (including --active true/false)
    Update(UpdateArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Include inactive suppliers
    #[arg(long)]
    pub all: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Supplier id
    pub id: i32,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Supplier name
    #[arg(long)]
    pub name: String,

    #[arg(long = "contact")]
    pub contact_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Supplier id
    pub id: i32,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "contact")]
    pub contact_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Activate or deactivate the supplier
    #[arg(long)]
    pub active: Option<bool>,
}

pub async fn run_supplier(args: SupplierArgs) -> Result<()> {
    match args.command {
        SupplierCommands::List(args) => run_list(args).await,
        SupplierCommands::Show(args) => run_show(args).await,
        SupplierCommands::Add(args) => run_add(args).await,
        SupplierCommands::Update(args) => run_update(args).await,
    }
}

async fn run_list(args: ListArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let suppliers = store::list_suppliers(&pool, args.all).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suppliers)?);
    } else if suppliers.is_empty() {
        println!("No suppliers found");
    } else {
        println!("{:<6} {:<30} {:<24} {:<8}", "ID", "NAME", "CONTACT", "ACTIVE");
        for s in &suppliers {
            println!(
                "{:<6} {:<30} {:<24} {:<8}",
                s.id,
                s.name,
                s.contact_name.as_deref().unwrap_or("-"),
                if s.active { "yes" } else { "no" }
            );
        }
    }
    Ok(())
}

async fn run_show(args: ShowArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let supplier = store::get_supplier(&pool, args.id)
        .await?
        .ok_or_else(|| anyhow!("supplier {} not found", args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&supplier)?);
    } else {
        print_supplier_detail(&supplier);
    }
    Ok(())
}

async fn run_add(args: AddArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let supplier = store::create_supplier(
        &pool,
        &NewSupplier {
            name: args.name,
            contact_name: args.contact_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            notes: args.notes,
        },
    )
    .await?;

    println!("Added supplier {} (id {})", supplier.name, supplier.id);
    Ok(())
}

async fn run_update(args: UpdateArgs) -> Result<()> {
    let pool = super::open_pool().await?;
    let update = SupplierUpdate {
        name: args.name,
        contact_name: args.contact_name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        notes: args.notes,
        active: args.active,
    };

    if update.is_empty() {
        return Err(anyhow!("no fields to update; pass at least one --option"));
    }

    let supplier = store::update_supplier(&pool, args.id, &update).await?;
    println!("Updated supplier {} (id {})", supplier.name, supplier.id);
    Ok(())
}

fn print_supplier_detail(s: &Supplier) {
    println!("{} (id {})", s.name, s.id);
    println!("  Active:   {}", if s.active { "yes" } else { "no" });
    if let Some(contact) = &s.contact_name {
        println!("  Contact:  {contact}");
    }
    if let Some(email) = &s.email {
        println!("  Email:    {email}");
    }
    if let Some(phone) = &s.phone {
        println!("  Phone:    {phone}");
    }
    if let Some(address) = &s.address {
        println!("  Address:  {address}");
    }
    if let Some(notes) = &s.notes {
        println!("  Notes:    {notes}");
    }
}
