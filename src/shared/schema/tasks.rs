diesel::table! {
    tasks (id) {
        id -> Uuid,
        project_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        assigned_to -> Nullable<Uuid>,
        status -> Text,
        priority -> Text,
        time_spent_in_minutes -> Int4,
        start_at -> Nullable<Timestamptz>,
        due_at -> Nullable<Timestamptz>,
        end_at -> Nullable<Timestamptz>,
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    task_reviews (id) {
        id -> Uuid,
        task_id -> Uuid,
        reviewer_id -> Uuid,
        task_owner_id -> Uuid,
        quality_score -> Int4,
        notes -> Nullable<Text>,
        reviewed_at -> Timestamptz,
    }
}

diesel::table! {
    task_rejections (id) {
        id -> Uuid,
        task_id -> Uuid,
        rejected_by -> Uuid,
        reason -> Text,
        notes -> Nullable<Text>,
        rejected_at -> Timestamptz,
    }
}

diesel::joinable!(task_reviews -> tasks (task_id));
diesel::joinable!(task_rejections -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_reviews, task_rejections);
