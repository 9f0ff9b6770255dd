//! User-facing message texts.

use crate::workflow::Command;

pub const FILE_RECEIVED: &str = "✅ File diterima. Ketik /done untuk lanjut.";
pub const FILE_RECEIVED_MORE: &str = "✅ File diterima. Ketik /done jika sudah.";
pub const NO_FILES: &str = "⚠️ Belum ada file. Kirim file dulu.";
pub const RECEIVE_FAILED: &str = "⚠️ Gagal menerima file. Coba lagi.";
pub const DELIVERY_FAILED: &str =
    "Terjadi kesalahan saat mengirim file. Silakan coba lagi nanti atau hubungi admin.";

pub const FILES_SENT: &str = "📤 File berhasil dikirim!";
pub const FILES_SENT_SHORT: &str = "📤 File sudah dikirim!";

pub const INVALID_NUMBERS: &str = "Nomor tidak valid. Masukkan ulang nomor (pisahkan per baris):";
pub const EMPTY_CONTACT_NAME: &str = "Nama kontak tidak boleh kosong. Masukkan nama kontak:";
pub const EMPTY_FILE_NAME: &str = "Nama file tidak boleh kosong. Masukkan nama file:";
pub const EMPTY_NEW_FILE_NAME: &str = "Nama file tidak boleh kosong. Masukkan nama file baru:";

// to_vcf
pub const TO_VCF_START: &str = "📥 Kirim file .txt atau .xlsx";
pub const ASK_CONTACT_NAME: &str = "📝 Masukkan nama kontak:";
pub const ASK_FILE_NAME: &str = "💾 Masukkan nama file:";
pub const ASK_SPLIT_CHOICE: &str = "🔢 Jumlah kontak per file atau ketik 'semua':";
pub const INVALID_SPLIT_CHOICE: &str = "⚠️ Input salah. Ketik 'semua' atau jumlah kontak per file.";

// to_txt
pub const TO_TXT_START: &str = "📄 Kirim file untuk diubah ke .txt";
pub const TO_TXT_REJECTS_TXT: &str = "❌ Format .txt tidak didukung!\nKetik /to_txt untuk mulai ulang.";

// manual
pub const MANUAL_ASK_NUMBERS: &str = "Masukkan nomor:";
pub const MANUAL_ASK_CONTACT_NAME: &str = "Masukkan nama kontak:";
pub const MANUAL_ASK_FILE_NAME: &str = "Masukkan nama file:";
pub const MANUAL_SENT: &str = "File berhasil dikirim.";

// add
pub const ADD_START: &str = "📥 Kirim file yang ingin ditambah nomor";
pub const ADD_ASK_NUMBERS: &str = "📝 Masukkan nomor yang ingin ditambahkan:";
pub const ADD_ASK_CONTACT_NAME: &str = "Masukkan nama kontak untuk nomor baru:";

// delete
pub const DELETE_START: &str = "🗑️ Kirim file yang ingin dihapus nomornya";
pub const DELETE_ASK_NUMBERS: &str = "🚫 Masukkan nomor yang ingin dihapus (satu per baris):";
pub const DELETE_INVALID_NUMBERS: &str =
    "Nomor tidak valid. Masukkan ulang nomor yang ingin dihapus (pisahkan per baris):";

// merge
pub const MERGE_START: &str = "📎 Kirim file yang mau digabung.\nminimal 2 file, format sama.";
pub const MERGE_MISMATCH: &str = "❌ Semua file harus format sama!\nUlangi dengan /merge";
pub const MERGE_TOO_FEW: &str = "⚠️ Minimal 2 file. Kirim file lagi.";
pub const MERGE_ASK_NAME: &str = "📝 Nama file hasil gabung (tanpa ekstensi)?";
pub const MERGE_EMPTY_NAME: &str = "Nama file tidak boleh kosong. Coba lagi:";
pub const MERGE_SENT: &str = "✅ File gabungan sudah dikirim!";

// split
pub const SPLIT_START: &str = "Pilih cara split:\n🔢 Per File\n📦 Per Kontak";
pub const SPLIT_SEND_FILES: &str = "📎 Kirim file yang mau dipecah.";
pub const SPLIT_ASK_FILE_COUNT: &str = "🔢 Mau dipecah jadi berapa file?";
pub const SPLIT_ASK_PER_FILE: &str = "📦 Berapa kontak per file?";
pub const SPLIT_INVALID_COUNT: &str = "❌ Input harus angka > 0. Coba lagi.";
pub const SPLIT_SENT: &str = "📤 File hasil split sudah dikirim!";

// count / nodup
pub const COUNT_START: &str = "📎 Kirim file yang mau dihitung kontaknya.";
pub const NODUP_START: &str = "📎 Kirim file yang mau dihapus nomor duplikatnya.";
pub const NODUP_NONE: &str = "✅ Nomor duplikat tidak ditemukan di file manapun.";

// renamectc
pub const RENAME_CONTACT_START: &str = "Kirim file .vcf yang mau diganti nama kontaknya";
pub const RENAME_CONTACT_VCF_ONLY: &str = "❌ Hanya file .vcf yang didukung!\nKetik /renamectc untuk mulai ulang.";
pub const RENAME_CONTACT_ASK_OLD: &str = "Masukkan nama kontak yang mau diganti:";
pub const RENAME_CONTACT_EMPTY_OLD: &str =
    "Nama kontak tidak boleh kosong. Masukkan nama kontak yang mau diganti:";
pub const RENAME_CONTACT_NOT_FOUND: &str = "❌ Nama kontak tidak ditemukan di file manapun. Proses dibatalkan.";
pub const RENAME_CONTACT_ASK_NEW: &str = "Nama kontak ditemukan.\nMau diganti jadi apa?";
pub const RENAME_CONTACT_EMPTY_NEW: &str = "Nama baru tidak boleh kosong. Masukkan nama baru:";

// renamefile
pub const RENAME_FILE_START: &str = "Pilih mode rename file:";
pub const RENAME_FILE_SEND_FILES: &str = "Kirim file yang mau diganti nama";
pub const RENAME_FILE_ASK_BASE: &str = "Masukkan nama file baru:";

/// Feature list shown by `/start` and `/help`.
pub const FEATURES: &[&str] = &[
    "/to_vcf      - konversi file ke .vcf",
    "/to_txt      - konversi file ke .txt",
    "/manual      - input kontak manual",
    "/add         - tambah kontak ke .vcf",
    "/delete      - hapus kontak dari file",
    "/renamectc   - ganti nama kontak",
    "/renamefile  - ganti nama file",
    "/merge       - gabungkan file",
    "/split       - pecah file",
    "/count       - hitung jumlah kontak",
    "/nodup       - hapus kontak duplikat",
];

pub fn help() -> String {
    format!("Fitur bot:\n{}", FEATURES.join("\n"))
}

pub fn welcome(name: &str) -> String {
    format!("Hallo {name}, selamat datang di bot\n{}", help())
}

/// Rejection of an upload whose extension the workflow does not take.
pub fn unsupported_format(command: Command) -> String {
    match command {
        Command::ToVcf | Command::ToTxt | Command::Add | Command::Delete => {
            format!("❌ Format file tidak didukung!\nKetik /{command} untuk mulai ulang.")
        }
        _ => format!("❌ Format file tidak didukung!\nUlangi dengan /{command}"),
    }
}

/// Rejection text for an upload with extension `ext`.
pub fn rejection(command: Command, ext: &str) -> String {
    match command {
        Command::ToTxt if ext == ".txt" => TO_TXT_REJECTS_TXT.to_string(),
        Command::RenameContact => RENAME_CONTACT_VCF_ONLY.to_string(),
        _ => unsupported_format(command),
    }
}

/// Terminal failure notice for a workflow.
pub fn failure(command: Command) -> String {
    match command {
        Command::Merge => "❌ Gagal gabung file. Ulangi dengan /merge".to_string(),
        Command::Split => "❌ Gagal split file. Ulangi dengan /split".to_string(),
        Command::Count => "❌ Gagal hitung kontak. Ulangi dengan /count".to_string(),
        Command::Nodup => "❌ Gagal hapus duplikat. Ulangi dengan /nodup".to_string(),
        Command::RenameFile => "❌ Gagal rename file. Ketik /renamefile untuk ulang.".to_string(),
        Command::Manual => "Gagal membuat/mengirim file. Ketik /manual untuk ulang.".to_string(),
        _ => format!("❌ Gagal proses file. Ketik /{command} untuk ulang."),
    }
}

pub fn no_numbers_in(file_name: &str) -> String {
    format!("⚠️ Tidak ada nomor di {file_name}.")
}

pub fn split_too_few(noun: &str, total: usize, count: usize) -> String {
    format!("⚠️ {noun} cuma {total}. Tidak bisa dipecah jadi {count} file.")
}

pub fn count_report(files: &[(String, usize)], total: usize) -> String {
    let mut out = String::from("📊 Hasil hitung kontak:");
    for (name, n) in files {
        out.push_str(&format!("\n{name}: {n} kontak"));
    }
    out.push_str(&format!("\nTotal semua file: {total} kontak"));
    out
}

pub fn duplicates_in(file_name: &str, removed: usize) -> String {
    format!("{file_name}: {removed} nomor duplikat dihapus")
}

pub fn duplicates_removed(total: usize) -> String {
    format!("🔎 {total} nomor duplikat dihapus di semua file.")
}

pub fn ask_new_file_name(file_name: &str) -> String {
    format!("Nama baru untuk file {file_name}:")
}
