mod careers;
mod health_check;
