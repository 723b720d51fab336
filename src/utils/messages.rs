//! Notification text composition. Everything here is pure string building;
//! delivery (outbox worker, wa.me deep link) happens elsewhere.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use crate::error::{Error, Result};

const FOOTER: &str = "---\n*PT Sarana Media Cemerlang*\nJagonet - Internet Service Provider";

const DAY_NAMES: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

fn wib() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("UTC+7 is in range")
}

/// Long-form Indonesian date in WIB, e.g. "Kamis, 05 Maret 2026".
pub fn format_date_id(dt: DateTime<Utc>) -> String {
    let local = dt.with_timezone(&wib());
    let day_name = DAY_NAMES[local.weekday().num_days_from_monday() as usize];
    let month_name = MONTH_NAMES[local.month0() as usize];
    format!("{day_name}, {:02} {month_name} {}", local.day(), local.year())
}

/// Clock time in WIB with the Indonesian dot separator, e.g. "09.30".
pub fn format_time_id(dt: DateTime<Utc>) -> String {
    let local = dt.with_timezone(&wib());
    format!("{:02}.{:02}", local.hour(), local.minute())
}

/// The three candidate-facing notification texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Interview,
    Accepted,
    Rejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Interview => "interview",
            NotificationKind::Accepted => "accepted",
            NotificationKind::Rejected => "rejected",
        }
    }

    pub fn email_subject(&self, position_title: &str) -> String {
        match self {
            NotificationKind::Interview => format!(
                "Undangan Interview - {position_title} | PT Sarana Media Cemerlang (Jagonet)"
            ),
            NotificationKind::Accepted => format!(
                "Selamat! Anda Diterima - {position_title} | PT Sarana Media Cemerlang (Jagonet)"
            ),
            NotificationKind::Rejected => format!(
                "Pemberitahuan Hasil Seleksi - {position_title} | PT Sarana Media Cemerlang"
            ),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "interview" => Ok(NotificationKind::Interview),
            "accepted" => Ok(NotificationKind::Accepted),
            "rejected" => Ok(NotificationKind::Rejected),
            other => Err(Error::BadRequest(format!("Jenis pesan tidak valid: {other}"))),
        }
    }
}

/// Interview invitation, same wording the HR dashboard sends by hand. The
/// optional notes paragraph is only present when notes were entered.
pub fn interview_invite(
    full_name: &str,
    position_title: &str,
    scheduled_date: DateTime<Utc>,
    location: &str,
    notes: Option<&str>,
) -> String {
    let date_str = format_date_id(scheduled_date);
    let time_str = format_time_id(scheduled_date);
    let notes_block = match notes {
        Some(n) if !n.trim().is_empty() => format!("📝 *Catatan:*\n{n}\n\n"),
        _ => String::new(),
    };

    format!(
        "Halo {full_name},\n\n\
         Selamat! Kami dari PT Sarana Media Cemerlang (Jagonet) ingin mengundang Anda untuk interview untuk posisi *{position_title}*.\n\n\
         📅 *Jadwal Interview:*\n\
         Tanggal: {date_str}\n\
         Waktu: {time_str} WIB\n\
         Lokasi: {location}\n\n\
         {notes_block}Mohon konfirmasi kehadiran Anda dengan membalas pesan ini.\n\n\
         Terima kasih dan sampai jumpa!\n\n\
         {FOOTER}"
    )
}

pub fn acceptance_message(full_name: &str, position_title: &str) -> String {
    format!(
        "Selamat {full_name}! 🎉\n\n\
         Kami dengan senang hati memberitahukan bahwa Anda *DITERIMA* untuk posisi *{position_title}* di PT Sarana Media Cemerlang (Jagonet).\n\n\
         Tim HRD kami akan segera menghubungi Anda untuk proses selanjutnya.\n\n\
         Selamat bergabung dengan keluarga besar Jagonet! 🚀\n\n\
         {FOOTER}"
    )
}

pub fn rejection_message(full_name: &str, position_title: &str) -> String {
    format!(
        "Halo {full_name},\n\n\
         Terima kasih atas minat dan waktu Anda untuk melamar posisi *{position_title}* di PT Sarana Media Cemerlang (Jagonet).\n\n\
         Setelah melalui proses seleksi yang ketat, dengan berat hati kami informasikan bahwa saat ini kami belum dapat melanjutkan lamaran Anda untuk posisi tersebut.\n\n\
         Kami sangat menghargai usaha Anda dan berharap dapat bekerja sama di kesempatan lain.\n\n\
         Sukses selalu untuk karir Anda! 💪\n\n\
         {FOOTER}"
    )
}

/// `https://wa.me/<phone>?text=<encoded>` deep link for the dashboard's
/// click-to-chat flow. `phone` must already be in international digits form.
pub fn wa_link(phone: &str, message: &str) -> Result<String> {
    let url = url::Url::parse_with_params(&format!("https://wa.me/{phone}"), &[("text", message)])
        .map_err(|e| Error::Internal(format!("wa.me link construction failed: {e}")))?;
    Ok(url.to_string())
}
