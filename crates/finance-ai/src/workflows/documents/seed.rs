//! Demo catalog loaded into the in-memory repository at startup.

use super::domain::DocumentRecord;

const COMPLETED: &[(&str, &str, &str, &str, u8)] = &[
    ("SN3H4A", "Sneha Reddy", "sneha_reddy_aadhaar.pdf", "Aadhaar Card", 4),
    ("SN3H4A", "Sneha Reddy", "sneha_reddy_pan.pdf", "PAN Card", 3),
    ("VK9R2M", "Vikram Desai", "vikram_itr_2024-25.pdf", "ITR / Tax Return", 5),
    ("VK9R2M", "Vikram Desai", "vikram_bank_6months.pdf", "Bank Statement", 5),
    ("PR1Y4P", "Priya Patel", "priya_salary_nov2025.pdf", "Salary Slip", 4),
    ("PR1Y4P", "Priya Patel", "priya_pan.jpg", "PAN Card", 3),
];

const PENDING: &[(&str, &str, &str, &str)] = &[
    ("R4V1K2", "Ravi Kumar", "ravi_aadhaar.pdf", "Aadhaar Card"),
    ("R4V1K2", "Ravi Kumar", "ravi_salary_dec2025.pdf", "Salary Slip"),
    ("RJ5SH9", "Rajesh Verma", "rajesh_bank_statement.pdf", "Bank Statement"),
];

pub fn seed_documents() -> Vec<DocumentRecord> {
    let mut records: Vec<DocumentRecord> = COMPLETED
        .iter()
        .map(|&(customer_id, name, file, kind, fields)| {
            DocumentRecord::pending(customer_id, name, file, kind).completed(fields)
        })
        .chain(PENDING.iter().map(|&(customer_id, name, file, kind)| {
            DocumentRecord::pending(customer_id, name, file, kind)
        }))
        .collect();

    records.push(
        DocumentRecord::pending("AM1T07", "Amit Sharma", "amit_salary_oct2025.pdf", "Salary Slip")
            .completed(4),
    );
    records.push(DocumentRecord::pending(
        "NE8H45",
        "Neha Gupta",
        "neha_aadhaar.pdf",
        "Aadhaar Card",
    ));
    records
}
