use chrono::NaiveDate;
use gst_compliance_engine::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let gstin = "29AAGCB7383J1Z4";
    let validation = validate_gstin(gstin);
    println!("GSTIN {}: {}", gstin, validation);

    let start: FilingPeriod = "2024-04".parse()?;
    let end: FilingPeriod = "2025-03".parse()?;
    let calendar = compliance_calendar(start, end, FilingFrequency::Quarterly, Some(40_000_000.0))?;

    println!("\nQRMP calendar for FY {}:", start.financial_year_label());
    for info in &calendar {
        println!(
            "{}  GSTR-1 {}  GSTR-3B {}{}  reminder {}",
            info.month,
            info.gstr1_due_date,
            info.gstr3b_due_date,
            if info.gstr3b_advisory { " (IFF month)" } else { "" },
            info.reminder_date
        );
    }

    let today = NaiveDate::from_ymd_opt(2024, 7, 1).ok_or("invalid date")?;
    println!("\nReminders in the next 30 days from {}:", today);
    for info in upcoming_reminders(&calendar, today, 30) {
        println!("{} on {}", info.month, info.reminder_date);
    }

    Ok(())
}
