//! Diesel schema for genre persistence.

diesel::table! {
    /// Genre catalog entries.
    genres (id) {
        /// Genre identifier.
        id -> Uuid,
        /// Unique display name.
        #[max_length = 255]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
