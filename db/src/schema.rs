table! {
    answers (id) {
        id -> Int4,
        session_id -> Int4,
        participant_id -> Int4,
        question_id -> Int4,
        answer_index -> Int4,
        is_correct -> Bool,
        points_earned -> Int4,
        answered_at -> Timestamptz,
    }
}

table! {
    participants (id) {
        id -> Int4,
        session_id -> Int4,
        display_name -> Varchar,
        token -> Nullable<Text>,
        joined_at -> Timestamptz,
    }
}

table! {
    questions (id) {
        id -> Int4,
        session_id -> Nullable<Int4>,
        order_no -> Nullable<Int4>,
        question_text -> Text,
        options -> Array<Text>,
        correct_index -> Int4,
        points -> Int4,
        created_at -> Timestamptz,
    }
}

table! {
    rate_limits (category, identifier) {
        category -> Varchar,
        identifier -> Varchar,
        count -> Int4,
        reset_at -> Timestamptz,
    }
}

table! {
    sessions (id) {
        id -> Int4,
        code -> Varchar,
        title -> Varchar,
        organizer -> Nullable<Text>,
        created_at -> Timestamptz,
        ended_at -> Nullable<Timestamptz>,
    }
}

joinable!(answers -> participants (participant_id));
joinable!(answers -> questions (question_id));
joinable!(answers -> sessions (session_id));
joinable!(participants -> sessions (session_id));
joinable!(questions -> sessions (session_id));

allow_tables_to_appear_in_same_query!(answers, participants, questions, rate_limits, sessions,);
