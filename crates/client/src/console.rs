//! Line-oriented console front end for the workbench.
//!
//! Each input line is one command. Output is plain text; logs go to stderr.

use std::fmt::Write as _;

use curdworks_core::{CustomerId, find_by_id};
use curdworks_parties::CustomerField;
use curdworks_products::ProductField;
use curdworks_sales::{PendingField, SkipReason, SubmitOutcome};

use crate::workbench::{BackOffice, Workbench};

pub const HELP: &str = "\
commands:
  customers | products | orders      list data from the API
  refresh                            re-fetch all lists
  customer <id> | customer -         select / clear the order customer
  product <id>                       pending line: product
  qty <kg>                           pending line: quantity in kg
  price [<per kg>]                   pending line: price override (empty = catalog)
  add                                add the pending line to the draft
  remove <n>                         remove draft line n (1-based)
  notes <text>                       set order notes
  draft                              show the draft and subtotal
  submit                             create the order
  new-customer name | email | phone | address
  new-product name | sku | price per kg | stock kg
  help | quit";

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Customers,
    Products,
    Orders,
    Refresh,
    SelectCustomer(Option<String>),
    Pending(PendingField, String),
    Add,
    Remove(usize),
    Notes(String),
    Draft,
    Submit,
    NewCustomer(Vec<String>),
    NewProduct(Vec<String>),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let cmd = match head {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "customers" => Command::Customers,
            "products" => Command::Products,
            "orders" => Command::Orders,
            "refresh" => Command::Refresh,
            "customer" => match rest {
                "" => return Err("usage: customer <id> | customer -".to_string()),
                "-" => Command::SelectCustomer(None),
                id => Command::SelectCustomer(Some(id.to_string())),
            },
            "product" => Command::Pending(PendingField::Product, rest.to_string()),
            "qty" => Command::Pending(PendingField::Quantity, rest.to_string()),
            "price" => Command::Pending(PendingField::UnitPrice, rest.to_string()),
            "add" => Command::Add,
            "remove" => {
                let n = rest
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| "usage: remove <line number>".to_string())?;
                Command::Remove(n - 1)
            }
            "notes" => Command::Notes(rest.to_string()),
            "draft" => Command::Draft,
            "submit" => Command::Submit,
            "new-customer" => Command::NewCustomer(split_fields(rest)),
            "new-product" => Command::NewProduct(split_fields(rest)),
            "" => return Err(String::new()),
            other => return Err(format!("unknown command `{other}`; type `help`")),
        };
        Ok(cmd)
    }
}

fn split_fields(rest: &str) -> Vec<String> {
    rest.split('|').map(|f| f.trim().to_string()).collect()
}

/// Execute one command against the workbench and render the result.
pub async fn execute<A: BackOffice>(wb: &mut Workbench<A>, cmd: Command) -> String {
    match cmd {
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
        Command::Customers => render_customers(wb),
        Command::Products => render_products(wb),
        Command::Orders => render_orders(wb),
        Command::Refresh => {
            wb.refresh_all().await;
            format!(
                "{} customers, {} products, {} orders",
                wb.customers().len(),
                wb.catalog().products().len(),
                wb.orders().len()
            )
        }
        Command::SelectCustomer(id) => {
            let id = id.map(CustomerId::new);
            let label = id
                .as_ref()
                .map(|id| customer_label(wb, id))
                .unwrap_or_else(|| "none".to_string());
            wb.select_customer(id);
            format!("customer: {label}")
        }
        Command::Pending(field, value) => {
            wb.set_pending(field, value);
            render_pending(wb)
        }
        Command::Add => match wb.add_item() {
            Ok(_) => render_draft(wb),
            // Guard no-op: the entry stays as typed.
            Err(_) => render_pending(wb),
        },
        Command::Remove(index) => {
            wb.remove_item(index);
            render_draft(wb)
        }
        Command::Notes(text) => {
            wb.set_notes(text);
            "notes updated".to_string()
        }
        Command::Draft => render_draft(wb),
        Command::Submit => {
            let outcome = wb.submit_order().await;
            match outcome {
                SubmitOutcome::Skipped(SkipReason::Incomplete) => {
                    "select a customer and add at least one item first".to_string()
                }
                SubmitOutcome::Skipped(SkipReason::Busy) => "a submission is in progress".to_string(),
                _ => render_notice(wb),
            }
        }
        Command::NewCustomer(fields) => {
            let names = [
                CustomerField::Name,
                CustomerField::Email,
                CustomerField::Phone,
                CustomerField::Address,
            ];
            for (field, value) in names.into_iter().zip(fields) {
                wb.set_customer_field(field, value);
            }
            wb.save_customer().await;
            render_notice(wb)
        }
        Command::NewProduct(fields) => {
            let names = [
                ProductField::Name,
                ProductField::Sku,
                ProductField::PricePerKg,
                ProductField::StockKg,
            ];
            for (field, value) in names.into_iter().zip(fields) {
                wb.set_product_field(field, value);
            }
            wb.save_product().await;
            render_notice(wb)
        }
    }
}

fn customer_label<A: BackOffice>(wb: &Workbench<A>, id: &CustomerId) -> String {
    find_by_id(wb.customers(), id)
        .map(|c| format!("{} ({})", c.name, id))
        .unwrap_or_else(|| id.to_string())
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn render_customers<A: BackOffice>(wb: &Workbench<A>) -> String {
    let mut out = String::from("ID\tNAME\tEMAIL\tPHONE");
    for c in wb.customers() {
        let _ = write!(
            out,
            "\n{}\t{}\t{}\t{}",
            c.id,
            c.name,
            or_dash(c.email.as_deref()),
            or_dash(c.phone.as_deref())
        );
    }
    out
}

pub fn render_products<A: BackOffice>(wb: &Workbench<A>) -> String {
    let mut out = String::from("ID\tNAME\tSKU\tPRICE/KG");
    for p in wb.catalog().products() {
        let _ = write!(
            out,
            "\n{}\t{}\t{}\t${:.2}",
            p.id,
            p.name,
            or_dash(p.sku.as_deref()),
            p.price_per_kg
        );
    }
    out
}

pub fn render_orders<A: BackOffice>(wb: &Workbench<A>) -> String {
    let mut out = String::from("DATE\tCUSTOMER\tSTATUS\tTOTAL");
    for row in wb.recent_orders() {
        let _ = write!(
            out,
            "\n{}\t{}\t{}\t${}",
            row.date, row.customer, row.status, row.total
        );
    }
    out
}

pub fn render_pending<A: BackOffice>(wb: &Workbench<A>) -> String {
    let draft = wb.draft();
    let pending = draft.pending();
    format!(
        "pending: product={} qty={} price={}",
        or_dash(Some(pending.product_id.as_str())),
        or_dash(Some(pending.quantity_kg.as_str())),
        or_dash(Some(pending.unit_price.as_str())),
    )
}

pub fn render_draft<A: BackOffice>(wb: &Workbench<A>) -> String {
    let mut out = String::new();
    let customer = wb
        .draft()
        .customer_id()
        .cloned()
        .map(|id| customer_label(wb, &id))
        .unwrap_or_else(|| "-".to_string());
    let _ = write!(out, "customer: {customer}");

    let lines = wb.draft_lines();
    if !lines.is_empty() {
        out.push_str("\n#\tPRODUCT\tQTY (KG)\tUNIT\tLINE TOTAL");
        for (i, line) in lines.iter().enumerate() {
            let _ = write!(
                out,
                "\n{}\t{}\t{:.2}\t${:.2}\t${:.2}",
                i + 1,
                line.product_name,
                line.quantity_kg,
                line.unit_price,
                line.line_total
            );
        }
    }

    let notes = wb.draft().notes().to_string();
    if !notes.is_empty() {
        let _ = write!(out, "\nnotes: {notes}");
    }
    let _ = write!(
        out,
        "\nitems: {}\tsubtotal: ${:.2}{}",
        lines.len(),
        wb.subtotal(),
        if wb.can_submit() { "" } else { "\t(not ready to submit)" }
    );
    out
}

fn render_notice<A: BackOffice>(wb: &Workbench<A>) -> String {
    wb.notice().map(ToString::to_string).unwrap_or_default()
}
