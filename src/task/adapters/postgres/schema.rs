//! Diesel schema for task aggregate persistence.

diesel::table! {
    /// Task aggregate roots.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        title -> Text,
        /// Optional long-form description.
        description -> Nullable<Text>,
        /// Optional genre reference.
        genre_id -> Nullable<Uuid>,
        /// Optional start date.
        start_date -> Nullable<Date>,
        /// Optional task-level end date.
        end_date -> Nullable<Date>,
        /// Completion flag.
        completed -> Bool,
        /// Timestamp of the latest completion.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency revision.
        version -> Int8,
    }
}

diesel::table! {
    /// Work processes owned by a task.
    task_processes (id) {
        /// Process identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Position within the owning task's collection.
        position -> Int4,
        /// Process name.
        name -> Text,
        /// Optional start date.
        start_date -> Nullable<Date>,
        /// Required end date.
        end_date -> Date,
        /// Completion flag.
        completed -> Bool,
    }
}

diesel::table! {
    /// Related links owned by a task.
    task_related_links (id) {
        /// Link identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Position within the owning task's collection.
        position -> Int4,
        /// Display name.
        name -> Text,
        /// Target URL.
        #[max_length = 1000]
        url -> Varchar,
    }
}

diesel::table! {
    /// Image records owned by a task.
    task_images (id) {
        /// Image identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Position within the owning task's collection.
        position -> Int4,
        /// System-generated stored filename.
        stored_filename -> Text,
        /// User-supplied filename.
        original_filename -> Text,
    }
}

diesel::joinable!(task_processes -> tasks (task_id));
diesel::joinable!(task_related_links -> tasks (task_id));
diesel::joinable!(task_images -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_processes, task_related_links, task_images);
