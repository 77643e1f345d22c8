//! Unit tests for the genre catalog.
