pub mod job_store;
