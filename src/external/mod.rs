pub mod fmcsa;
pub mod mailer;
