//! Guest-facing confirmation message and WhatsApp deep link

use std::fmt::Write;

use serde::Serialize;

use crate::domain::booking::Booking;
use crate::domain::room::{Room, RoomType};

pub const DEFAULT_WHATSAPP_NUMBER: &str = "6281396554949";

const GUEST_DATE_FORMAT: &str = "%d %b %Y";

/// Hotel-specific parts of the message.
#[derive(Debug, Clone)]
pub struct ConfirmationTemplate {
    pub hotel_name: String,
    pub whatsapp_number: String,
    pub payment_instructions: String,
}

impl Default for ConfirmationTemplate {
    fn default() -> Self {
        Self {
            hotel_name: "Mutiara Hotel".to_string(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            payment_instructions: "Please transfer to BCA 1234567890 a.n. Hotel Mutiara.\n\
                                   Confirm after transfer."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub message: String,
    pub whatsapp_url: String,
}

impl ConfirmationTemplate {
    /// Render one message for the bookings created by a single request.
    /// All bookings share the guest details and the stay.
    pub fn render(&self, room_type: &RoomType, booked: &[(Booking, Room)]) -> Confirmation {
        let message = self.message(room_type, booked);
        let whatsapp_url = format!(
            "https://wa.me/{}?text={}",
            self.whatsapp_number,
            query_escape(&message)
        );
        Confirmation {
            message,
            whatsapp_url,
        }
    }

    fn message(&self, room_type: &RoomType, booked: &[(Booking, Room)]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "*ROOM BOOKING - {}*", self.hotel_name.to_uppercase());
        out.push('\n');

        let Some((first, _)) = booked.first() else {
            return out;
        };

        let ids: Vec<String> = booked.iter().map(|(b, _)| format!("#{}", b.id)).collect();
        let numbers: Vec<&str> = booked.iter().map(|(_, r)| r.number.as_str()).collect();
        let total: i64 = booked.iter().map(|(b, _)| b.total_price).sum();

        let _ = writeln!(out, "Booking: {}", ids.join(", "));
        let _ = writeln!(out, "Name: {}", first.name);
        let _ = writeln!(out, "Phone: {}", first.phone);
        let _ = writeln!(
            out,
            "Room: {} (No. {})",
            room_type.category.display_name(),
            numbers.join(", ")
        );
        let _ = writeln!(out, "Check-in: {}", first.check_in.format(GUEST_DATE_FORMAT));
        let _ = writeln!(out, "Check-out: {}", first.check_out.format(GUEST_DATE_FORMAT));
        let _ = writeln!(out, "Nights: {}", first.total_nights);
        let _ = writeln!(out, "Guests: {}", first.guests);
        let _ = writeln!(out, "Total: {}", format_rupiah(total));

        if !first.notes.trim().is_empty() {
            let _ = write!(out, "\nNotes:\n{}\n", first.notes.trim());
        }
        if !self.payment_instructions.is_empty() {
            let _ = write!(out, "\n{}", self.payment_instructions);
        }
        out
    }
}

pub fn format_rupiah(amount: i64) -> String {
    format!("Rp {}", amount)
}

/// Query-string escaping in `application/x-www-form-urlencoded` form
/// (space becomes `+`).
fn query_escape(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingStatus;
    use crate::domain::room::{RoomCategory, RoomStatus};
    use chrono::{NaiveDate, Utc};

    fn booking(id: i32, room_id: i32) -> Booking {
        Booking {
            id,
            room_id,
            guest_id: None,
            name: "Rina Wijaya".into(),
            phone: "081234".into(),
            email: None,
            check_in: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            guests: 2,
            total_nights: 2,
            total_price: 1_000_000,
            status: BookingStatus::Pending,
            notes: "Late arrival".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn room(id: i32, number: &str) -> Room {
        Room {
            id,
            room_type_id: 1,
            number: number.into(),
            capacity: 2,
            status: RoomStatus::Available,
        }
    }

    fn deluxe() -> RoomType {
        RoomType {
            id: 1,
            category: RoomCategory::Deluxe,
            price_per_night: 500_000,
            description: String::new(),
        }
    }

    #[test]
    fn escapes_like_a_query_string() {
        assert_eq!(query_escape("a b&c=d"), "a+b%26c%3Dd");
        assert_eq!(query_escape("*Rp*\n"), "*Rp*%0A");
        assert_eq!(query_escape("é"), "%C3%A9");
    }

    #[test]
    fn message_lists_stay_and_total() {
        let template = ConfirmationTemplate::default();
        let c = template.render(&deluxe(), &[(booking(7, 1), room(1, "101"))]);

        assert!(c.message.starts_with("*ROOM BOOKING - MUTIARA HOTEL*"));
        assert!(c.message.contains("Booking: #7"));
        assert!(c.message.contains("Room: Deluxe (No. 101)"));
        assert!(c.message.contains("Check-in: 10 Jan 2024"));
        assert!(c.message.contains("Check-out: 12 Jan 2024"));
        assert!(c.message.contains("Nights: 2"));
        assert!(c.message.contains("Total: Rp 1000000"));
        assert!(c.message.contains("Late arrival"));
        assert!(c.whatsapp_url.starts_with("https://wa.me/6281396554949?text=*ROOM+BOOKING"));
    }

    #[test]
    fn multi_room_message_sums_totals() {
        let template = ConfirmationTemplate::default();
        let c = template.render(
            &deluxe(),
            &[(booking(7, 1), room(1, "101")), (booking(8, 2), room(2, "102"))],
        );
        assert!(c.message.contains("Booking: #7, #8"));
        assert!(c.message.contains("(No. 101, 102)"));
        assert!(c.message.contains("Total: Rp 2000000"));
    }
}
