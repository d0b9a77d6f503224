/// The four operations the webhook fulfils.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddTask,
    ListByCourse,
    ListByDate,
    UpdateStatus,
    Unknown(String),
}

impl Intent {
    /// Display names are matched trimmed and lowercased, with a few aliases each.
    pub fn from_display_name(name: Option<&str>) -> Self {
        let name = name.unwrap_or_default().trim().to_lowercase();
        match name.as_str() {
            "add_task" | "tambah_tugas" | "tambah tugas" => Intent::AddTask,
            "list_tasks_by_course" | "course" | "tugas_per_mata_kuliah" => Intent::ListByCourse,
            "list_tasks_by_date" | "tugas_per_tanggal" | "tugas_hari_ini" => Intent::ListByDate,
            "update_status" | "ubah_status_tugas" | "ubah status tugas" => Intent::UpdateStatus,
            _ => Intent::Unknown(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Intent::AddTask => "add_task",
            Intent::ListByCourse => "list_tasks_by_course",
            Intent::ListByDate => "list_tasks_by_date",
            Intent::UpdateStatus => "update_status",
            Intent::Unknown(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(Intent::from_display_name(Some(" Tambah Tugas ")), Intent::AddTask);
        assert_eq!(Intent::from_display_name(Some("course")), Intent::ListByCourse);
        assert_eq!(Intent::from_display_name(Some("tugas_hari_ini")), Intent::ListByDate);
        assert_eq!(Intent::from_display_name(Some("UBAH_STATUS_TUGAS")), Intent::UpdateStatus);
        assert_eq!(Intent::from_display_name(None), Intent::Unknown(String::new()));
        assert_eq!(Intent::from_display_name(Some("Default Welcome Intent")).name(), "default welcome intent");
    }
}
