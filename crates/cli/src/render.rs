//! Plain-text rendering of screen state.
//!
//! Everything writes to an `impl Write` so commands can target stdout and
//! tests can target a buffer.

use std::io::{self, Write};

use booking_console_admin::api::{Booking, ContactLead, Discount, LockedDate, PhoneLead, PriceList};
use booking_console_admin::format;
use booking_console_admin::screens::DashboardSummary;
use booking_console_admin::screens::dashboard::ServiceCollection;
use booking_console_admin::screens::prices::PriceValues;
use booking_console_core::{DiscountKind, ServiceLine};
use chrono_tz::Tz;

fn grand_total(booking: &Booking) -> Option<f64> {
    booking
        .price_details
        .as_ref()
        .and_then(|details| details.totals.grand_total)
}

/// One line per booking.
pub fn bookings(out: &mut impl Write, service: ServiceLine, rows: &[Booking], tz: Tz) -> io::Result<()> {
    writeln!(out, "{} ({} bokningar)", service.label(), rows.len())?;
    for booking in rows {
        writeln!(
            out,
            "{:<8} {:<24} {:<24} {:<10} {:>14}  {}",
            booking.display_number(),
            format::text(booking.name.as_deref()),
            format::date_time_in(booking.date.as_deref(), &tz),
            booking.status(),
            format::currency(grand_total(booking)),
            booking.id,
        )?;
    }
    Ok(())
}

/// Full booking, including service-specific fields.
pub fn booking(out: &mut impl Write, service: ServiceLine, booking: &Booking, tz: Tz) -> io::Result<()> {
    writeln!(out, "{} #{}", service.label(), booking.display_number())?;
    let rows = [
        ("Id", booking.id.to_string()),
        ("Namn", format::text(booking.name.as_deref()).to_string()),
        ("E-post", format::text(booking.email.as_deref()).to_string()),
        ("Telefon", format::text(booking.phone.as_deref()).to_string()),
        ("Datum", format::date_time_in(booking.date.as_deref(), &tz)),
        ("Tid", format::text(booking.time.as_deref()).to_string()),
        ("Adress", format::text(booking.address_street.as_deref()).to_string()),
        (
            "Yta",
            booking
                .size
                .map_or_else(|| format::MISSING.to_string(), |s| format!("{s} kvm")),
        ),
        ("Status", booking.status().to_string()),
        ("Meddelande", format::text(booking.message.as_deref()).to_string()),
        ("Skapad", format::date_time_in(booking.created_at.as_deref(), &tz)),
    ];
    for (label, value) in rows {
        writeln!(out, "  {label:<12} {value}")?;
    }

    if let Some(details) = &booking.price_details {
        writeln!(out, "  Pris")?;
        for line in &details.lines {
            writeln!(out, "    {:<32} {:>14}", line.label, format::currency(Some(line.amount)))?;
        }
        writeln!(
            out,
            "    {:<32} {:>14}",
            "Totalt",
            format::currency(details.totals.grand_total)
        )?;
    }

    for (key, value) in &booking.extra {
        writeln!(out, "  {key:<12} {value}")?;
    }
    Ok(())
}

/// Dashboard figures followed by per-collection load failures.
pub fn dashboard(
    out: &mut impl Write,
    summary: &DashboardSummary,
    collections: &[ServiceCollection],
    tz: Tz,
) -> io::Result<()> {
    for (service, count) in &summary.totals {
        writeln!(out, "{:<16} {count}", service.label())?;
    }
    writeln!(out, "{:<16} {}", "Idag", summary.today)?;
    writeln!(out, "{:<16} {}", "Kommande", summary.upcoming)?;

    writeln!(out)?;
    writeln!(out, "Senaste bokningar")?;
    for recent in &summary.recent {
        writeln!(
            out,
            "  {:<8} {:<14} {:<24} {}",
            recent.booking.display_number(),
            recent.service.label(),
            format::text(recent.booking.name.as_deref()),
            format::date_in(recent.booking.created_at.as_deref(), &tz),
        )?;
    }

    for collection in collections {
        if let Some(error) = &collection.error {
            writeln!(out, "! {}: {}", collection.service.label(), error.user_message())?;
        }
    }
    Ok(())
}

pub fn locked_dates(out: &mut impl Write, service: ServiceLine, rows: &[LockedDate]) -> io::Result<()> {
    writeln!(out, "Låsta datum, {}", service.label())?;
    if rows.is_empty() {
        writeln!(out, "  Inga låsta datum.")?;
    }
    for row in rows {
        writeln!(out, "  {}  {}", row.ymd, format::short_date(row.ymd))?;
    }
    Ok(())
}

fn discount_value(discount: &Discount) -> String {
    match discount.kind {
        DiscountKind::Percentage => format!("{} %", discount.value),
        DiscountKind::Fixed => format::currency(Some(discount.value)),
    }
}

pub fn discounts(out: &mut impl Write, rows: &[Discount]) -> io::Result<()> {
    for discount in rows {
        let uses = match (discount.uses, discount.max_uses) {
            (Some(uses), Some(max)) => format!("{uses}/{max}"),
            (Some(uses), None) => uses.to_string(),
            (None, Some(max)) => format!("0/{max}"),
            (None, None) => format::MISSING.to_string(),
        };
        writeln!(
            out,
            "{:<16} {:>14} {:<8} {:<10} {:<10} {:<8} {}",
            discount.code,
            discount_value(discount),
            if discount.is_active { "aktiv" } else { "inaktiv" },
            format::text(discount.valid_from.as_deref().map(|d| d.get(..10).unwrap_or(d))),
            format::text(discount.valid_until.as_deref().map(|d| d.get(..10).unwrap_or(d))),
            uses,
            discount.applicable_services.join(", "),
        )?;
    }
    Ok(())
}

pub fn prices(out: &mut impl Write, list: PriceList, values: &PriceValues) -> io::Result<()> {
    writeln!(out, "Priser, {}", list.label())?;
    for (field, value) in &values.values {
        writeln!(
            out,
            "  {:<20} {:<24} {}",
            field.key,
            field.label,
            format::text(Some(value))
        )?;
    }
    if let Some(message) = &values.ok_message {
        writeln!(out, "{message}")?;
    }
    Ok(())
}

pub fn contacts(out: &mut impl Write, rows: &[ContactLead], tz: Tz) -> io::Result<()> {
    for contact in rows {
        writeln!(
            out,
            "{}  {}  {} <{}> {}",
            contact.id,
            format::date_in(contact.created_at.as_deref(), &tz),
            format::text(Some(&contact.name)),
            contact.email,
            format::text(Some(&contact.phone)),
        )?;
        writeln!(
            out,
            "    {}, {} {} {}  {} kvm",
            format::text(Some(&contact.adress)),
            contact.postalcode,
            contact.city,
            format::text(Some(&contact.subject)),
            format::text(Some(&contact.kvm)),
        )?;
        if !contact.message.trim().is_empty() {
            writeln!(out, "    {}", contact.message.trim())?;
        }
    }
    Ok(())
}

pub fn phone_leads(out: &mut impl Write, rows: &[PhoneLead], tz: Tz) -> io::Result<()> {
    for lead in rows {
        writeln!(
            out,
            "{}  {:<14} {:<16} {:<14} {}",
            lead.id,
            lead.phone,
            format::text(Some(&lead.service)),
            lead.status,
            format::date_time_in(lead.created_at.as_deref(), &tz),
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const TZ: Tz = chrono_tz::Europe::Stockholm;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bookings_rows() {
        let rows: Vec<Booking> = serde_json::from_value(json!([{
            "_id": "66f1c0ffee0123456789abcd",
            "bookingNumber": 1042,
            "name": "Anna",
            "date": "2025-12-24T13:30:00.000Z",
            "status": "confirmed",
            "priceDetails": { "lines": [], "totals": { "grandTotal": 4500 } }
        }]))
        .unwrap();
        let text = output(|out| bookings(out, ServiceLine::Moving, &rows, TZ));
        assert!(text.starts_with("Flytthjälp (1 bokningar)"));
        assert!(text.contains("1042"));
        assert!(text.contains("24 dec. 2025 kl 14:30"));
        assert!(text.contains("4 500,00 kr"));
    }

    #[test]
    fn test_empty_locked_dates() {
        let text = output(|out| locked_dates(out, ServiceLine::Bygg, &[]));
        assert_eq!(text, "Låsta datum, Byggstädning\n  Inga låsta datum.\n");
    }

    #[test]
    fn test_discount_value() {
        let rows: Vec<Discount> = serde_json::from_value(json!([
            { "code": "SOMMAR", "type": "percentage", "value": 15, "isActive": true, "uses": 2, "maxUses": 10 },
            { "code": "FAST", "type": "fixed", "value": 500, "isActive": false }
        ]))
        .unwrap();
        let text = output(|out| discounts(out, &rows));
        assert!(text.contains("15 %"));
        assert!(text.contains("2/10"));
        assert!(text.contains("500,00 kr"));
        assert!(text.contains("inaktiv"));
    }
}
