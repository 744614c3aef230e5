//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! with `diesel print-schema`).

diesel::table! {
    /// Registered accounts. `email` is unique and stored lowercased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        full_name -> Varchar,
        phone -> Nullable<Varchar>,
        /// `user` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rentable listings.
    apartments (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// 1 or 2, enforced by a check constraint.
        bedrooms -> Int2,
        bathrooms -> Int2,
        max_guests -> Int4,
        /// Whole currency units.
        price_per_night -> Int8,
        address -> Varchar,
        city -> Varchar,
        country -> Varchar,
        square_meters -> Int4,
        amenities -> Array<Text>,
        is_available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listing photos; `position` preserves upload order.
    apartment_images (id) {
        id -> Uuid,
        apartment_id -> Uuid,
        image_url -> Text,
        is_main -> Bool,
        position -> Int4,
    }
}

diesel::table! {
    /// Reservations. The `bookings_no_overlap` exclusion constraint keeps
    /// active rows of one apartment from sharing any calendar day.
    bookings (id) {
        id -> Uuid,
        user_id -> Uuid,
        apartment_id -> Uuid,
        check_in -> Date,
        check_out -> Date,
        guests -> Int4,
        total_price -> Int8,
        /// `pending`, `confirmed`, `cancelled` or `completed`.
        status -> Varchar,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(apartment_images -> apartments (apartment_id));
diesel::joinable!(bookings -> apartments (apartment_id));
diesel::joinable!(bookings -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(apartment_images, apartments, bookings, users);
