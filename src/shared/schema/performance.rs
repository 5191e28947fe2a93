diesel::table! {
    performance_data (id) {
        id -> Uuid,
        user_id -> Uuid,
        project_id -> Uuid,
        working_hours -> Int8,
        task_completed -> Int4,
        quality_score -> Nullable<Float8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    overall_performances (id) {
        id -> Uuid,
        user_id -> Uuid,
        working_hours -> Int8,
        task_completed -> Int4,
        quality_score -> Nullable<Float8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
