//! User-facing reply text (Indonesian).

use super::calendar::format_for_user;
use crate::{task::Task, task_status::TaskStatus};

pub const ASK_TITLE: &str = "Judul tugasnya apa?";
pub const ASK_COURSE: &str = "Mata kuliahnya apa? Contoh: Kalkulus, Fisika Dasar, dst.";
pub const ASK_UPDATE_TITLE: &str =
    "Judul tugasnya apa yang mau diubah statusnya?\nContoh: Tandai tugas Quiz 1 selesai";
pub const UNHANDLED_INTENT: &str = "Webhook aktif, tapi intent ini belum di-handle.";
pub const SERVER_ERROR: &str = "Maaf, terjadi error di server. Coba lagi sebentar lagi ya.";
pub const UNREADABLE_REQUEST: &str = "Maaf, permintaannya tidak bisa dibaca. Coba ulangi lagi ya.";

pub fn task_saved(task: &Task, course_label: &str) -> String {
    format!(
        "✅ Oke, sudah aku simpan.\n• Tugas: {}\n• MK: {}\n• Deadline: {}\n• Prioritas: {}",
        task.title,
        course_label,
        format_for_user(&task.due_at),
        task.priority
    )
}

pub fn course_empty(course_label: &str, status: Option<TaskStatus>) -> String {
    match status {
        Some(status) => format!("Belum ada tugas {course_label} dengan status {status}."),
        None => format!("Belum ada tugas (atau semua sudah selesai) untuk {course_label}."),
    }
}

pub fn course_listing(course_label: &str, status: Option<TaskStatus>, tasks: &[Task], limit: usize) -> String {
    let header = match status {
        Some(status) => format!("📚 Tugas {course_label} dengan status {status}:"),
        None => format!("📚 Tugas {course_label} yang belum selesai:"),
    };
    let body = bulleted(tasks, limit, |t| {
        format!(
            "• {} — {} (prio: {}, status: {})",
            t.title,
            format_for_user(&t.due_at),
            t.priority,
            t.status
        )
    });
    format!("{header}\n{body}")
}

pub fn day_empty(day: &str) -> String {
    format!("Tidak ada tugas yang belum selesai pada {day}.")
}

pub fn day_listing(day: &str, tasks: &[Task], limit: usize) -> String {
    let body = bulleted(tasks, limit, |t| {
        format!(
            "• {} [{}] — {} (prio: {})",
            t.title,
            t.course,
            format_for_user(&t.due_at),
            t.priority
        )
    });
    format!("📅 Tugas yang belum selesai pada {day}:\n{body}")
}

pub fn not_found(title: &str) -> String {
    format!("Aku tidak menemukan tugas yang cocok dengan \"{title}\". Coba tulis judulnya lebih spesifik.")
}

pub fn status_changed(task: &Task) -> String {
    format!("✅ Oke. Status \"{}\" sudah jadi {}.", task.title, task.status)
}

pub fn completed_and_removed(task: &Task) -> String {
    format!("✅ Oke. \"{}\" sudah selesai dan dihapus dari daftar.", task.title)
}

/// One line per task, capped at `limit` (0 = no cap) with a "N more" tail.
fn bulleted(tasks: &[Task], limit: usize, line: impl Fn(&Task) -> String) -> String {
    let shown = if limit == 0 { tasks.len() } else { tasks.len().min(limit) };
    let mut lines: Vec<String> = tasks[..shown].iter().map(line).collect();
    let hidden = tasks.len() - shown;
    if hidden > 0 {
        lines.push(format!("…dan {hidden} tugas lainnya."));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fulfillment::calendar::end_of_day, task::TaskId, task_priority::TaskPriority};
    use chrono::NaiveDate;

    fn task(n: u32) -> Task {
        Task {
            id: TaskId(n.to_string()),
            user_id: "demo".into(),
            title: format!("Tugas {n}"),
            course: "kalkulus".into(),
            due_at: end_of_day(NaiveDate::from_ymd_opt(2025, 12, n).unwrap()),
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
        }
    }

    #[test]
    fn course_lines() {
        let text = course_listing("Kalkulus", None, &[task(1)], 10);
        assert_eq!(
            text,
            "📚 Tugas Kalkulus yang belum selesai:\n• Tugas 1 — 01 Des 2025, 23.59 WIB (prio: medium, status: todo)"
        );
    }

    #[test]
    fn truncates_with_tail() {
        let tasks: Vec<Task> = (1..=5).map(task).collect();
        let text = day_listing("2025-12-01", &tasks, 3);
        assert_eq!(text.lines().count(), 5);
        assert!(text.ends_with("…dan 2 tugas lainnya."));

        let all = day_listing("2025-12-01", &tasks, 0);
        assert!(!all.contains("lainnya"));
    }

    #[test]
    fn saved_reply_echoes_fields() {
        let text = task_saved(&task(20), "Kalkulus");
        assert!(text.contains("• Tugas: Tugas 20"));
        assert!(text.contains("• MK: Kalkulus"));
        assert!(text.contains("20 Des 2025, 23.59 WIB"));
        assert!(text.contains("• Prioritas: medium"));
    }
}
