//! Use-case services over the subscriber repository.

pub mod subscriber_service;
