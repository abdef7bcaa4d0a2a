// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    contacts (contact_id) {
        contact_id -> BigInt,
        name -> Text,
        phone -> Text,
        country -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    visa_operations (op_id) {
        op_id -> BigInt,
        vop_number -> Text,
        contact_id -> BigInt,
        name -> Text,
        phone -> Text,
        country -> Text,
        created_at -> Text,
        show_cgi_on_portal -> Integer,
        version -> BigInt,
        cgi_json -> Nullable<Text>,
        slot_booking_json -> Nullable<Text>,
        ds_json -> Nullable<Text>,
        interview_json -> Nullable<Text>,
    }
}

diesel::table! {
    documents (document_id) {
        document_id -> BigInt,
        file_name -> Text,
        content_type -> Text,
        size_bytes -> BigInt,
        data -> Binary,
        created_at -> Text,
    }
}

diesel::table! {
    operators (operator_id) {
        operator_id -> BigInt,
        login_name -> Text,
        display_name -> Text,
        password_hash -> Text,
        role -> Text,
        is_disabled -> Integer,
        created_at -> Text,
        disabled_at -> Nullable<Text>,
        last_login_at -> Nullable<Text>,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        operator_id -> BigInt,
        created_at -> Text,
        last_activity_at -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    audit_events (event_id) {
        event_id -> BigInt,
        op_id -> Nullable<BigInt>,
        vop_number -> Text,
        actor_operator_id -> Nullable<BigInt>,
        actor_json -> Text,
        cause_json -> Text,
        action_json -> Text,
        before_snapshot -> Text,
        after_snapshot -> Text,
        created_at -> Text,
    }
}

diesel::joinable!(visa_operations -> contacts (contact_id));
diesel::joinable!(sessions -> operators (operator_id));

diesel::allow_tables_to_appear_in_same_query!(
    contacts,
    visa_operations,
    documents,
    operators,
    sessions,
    audit_events,
);
