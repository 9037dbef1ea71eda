pub mod installment;

pub use installment::calculate_installment;
