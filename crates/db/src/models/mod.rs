pub mod contribution;
pub mod finance_entry;
pub mod legal_document;
pub mod member;
pub mod partner_agreement;
pub mod record;
pub mod service_ticket;
pub mod table;
