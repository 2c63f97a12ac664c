//! Built-in sample documents.
//!
//! One e-commerce schema (customers, orders, a summary view and a
//! lifetime-value routine) expressed in the idiom of each supported
//! platform, used for demos and as test fixtures.

use crate::models::{
    Column, Constraint, ConstraintKind, DatabaseInfo, Index, Platform, Routine, RoutineKind,
    SchemaDocument, Table, View,
};

fn column(
    name: &str,
    data_type: &str,
    nullable: bool,
    default: Option<&str>,
    description: &str,
) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        nullable,
        default: default.map(str::to_string),
        description: Some(description.to_string()),
    }
}

fn index(name: &str, columns: &[&str], index_type: &str, is_unique: bool) -> Index {
    Index {
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        index_type: index_type.to_string(),
        is_unique,
    }
}

fn constraint(
    name: &str,
    kind: ConstraintKind,
    columns: &[&str],
    definition_or_reference: Option<&str>,
) -> Constraint {
    Constraint {
        name: name.to_string(),
        kind,
        columns: columns.iter().map(|c| c.to_string()).collect(),
        definition_or_reference: definition_or_reference.map(str::to_string),
    }
}

fn database_info(name: &str, version: &str, size: &str, created: &str) -> DatabaseInfo {
    DatabaseInfo {
        name: name.to_string(),
        version: Some(version.to_string()),
        size: Some(size.to_string()),
        created: Some(created.to_string()),
        last_backup: Some("2024-07-27".to_string()),
    }
}

/// Returns the sample document for a platform.
pub fn sample_document(platform: Platform) -> SchemaDocument {
    match platform {
        Platform::PostgreSQL => postgresql(),
        Platform::Oracle => oracle(),
        Platform::SqlServer => sql_server(),
    }
}

/// Returns the sample documents for every platform, in presentation order.
pub fn all_samples() -> Vec<SchemaDocument> {
    Platform::ALL.iter().map(|p| sample_document(*p)).collect()
}

fn postgresql() -> SchemaDocument {
    use ConstraintKind::{Check, ForeignKey, PrimaryKey, Unique};

    let customers = Table {
        name: "customers".to_string(),
        schema: "public".to_string(),
        kind: "BASE TABLE".to_string(),
        row_count: 125_000,
        size_mb: 45.2,
        description: Some("Customer information and profiles".to_string()),
        columns: vec![
            column("customer_id", "SERIAL", false, Some("nextval('customers_customer_id_seq')"), "Primary key"),
            column("first_name", "VARCHAR(50)", false, None, "Customer first name"),
            column("last_name", "VARCHAR(50)", false, None, "Customer last name"),
            column("email", "VARCHAR(100)", false, None, "Customer email address"),
            column("phone", "VARCHAR(20)", true, None, "Customer phone number"),
            column("address", "JSONB", true, None, "Customer address in JSON format"),
            column("registration_date", "TIMESTAMP", false, Some("CURRENT_TIMESTAMP"), "Account registration date"),
            column("last_login", "TIMESTAMP", true, None, "Last login timestamp"),
            column("is_active", "BOOLEAN", false, Some("true"), "Account status"),
        ],
        indexes: vec![
            index("customers_pkey", &["customer_id"], "PRIMARY KEY", true),
            index("idx_customers_email", &["email"], "UNIQUE", true),
            index("idx_customers_name", &["last_name", "first_name"], "BTREE", false),
            index("idx_customers_registration", &["registration_date"], "BTREE", false),
        ],
        constraints: vec![
            constraint("customers_pkey", PrimaryKey, &["customer_id"], None),
            constraint("customers_email_key", Unique, &["email"], None),
            constraint(
                "chk_email_format",
                Check,
                &[],
                Some(r"email ~* '^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$'"),
            ),
        ],
    };

    let orders = Table {
        name: "orders".to_string(),
        schema: "public".to_string(),
        kind: "BASE TABLE".to_string(),
        row_count: 450_000,
        size_mb: 125.8,
        description: Some("Customer order information".to_string()),
        columns: vec![
            column("order_id", "SERIAL", false, Some("nextval('orders_order_id_seq')"), "Primary key"),
            column("customer_id", "INTEGER", false, None, "Reference to customers table"),
            column("order_date", "TIMESTAMP", false, Some("CURRENT_TIMESTAMP"), "Order creation date"),
            column("total_amount", "DECIMAL(10,2)", false, None, "Order total amount"),
            column("status", "VARCHAR(20)", false, Some("'pending'"), "Order status"),
            column("shipping_address", "JSONB", true, None, "Shipping address in JSON"),
            column("payment_method", "VARCHAR(50)", true, None, "Payment method used"),
        ],
        indexes: vec![
            index("orders_pkey", &["order_id"], "PRIMARY KEY", true),
            index("idx_orders_customer", &["customer_id"], "BTREE", false),
            index("idx_orders_date", &["order_date"], "BTREE", false),
            index("idx_orders_status", &["status"], "BTREE", false),
        ],
        constraints: vec![
            constraint("orders_pkey", PrimaryKey, &["order_id"], None),
            constraint("fk_orders_customer", ForeignKey, &["customer_id"], Some("customers(customer_id)")),
            constraint("chk_total_positive", Check, &[], Some("total_amount > 0")),
        ],
    };

    SchemaDocument {
        platform_name: Platform::PostgreSQL.to_string(),
        database_info: database_info("ecommerce_db", "PostgreSQL 15.2", "2.5 GB", "2023-01-15"),
        tables: vec![customers, orders],
        views: vec![View {
            name: "customer_summary".to_string(),
            schema: "public".to_string(),
            definition: "SELECT c.customer_id, c.first_name, c.last_name, COUNT(o.order_id) as total_orders, COALESCE(SUM(o.total_amount), 0) as total_spent FROM customers c LEFT JOIN orders o ON c.customer_id = o.customer_id GROUP BY c.customer_id, c.first_name, c.last_name".to_string(),
            description: Some("Customer order summary view".to_string()),
        }],
        routines: vec![Routine {
            name: "calculate_customer_lifetime_value".to_string(),
            schema: "public".to_string(),
            kind: RoutineKind::Function,
            parameters: "customer_id INTEGER".to_string(),
            return_type: Some("DECIMAL".to_string()),
            description: Some("Calculates lifetime value for a customer".to_string()),
        }],
    }
}

fn oracle() -> SchemaDocument {
    use ConstraintKind::{Check, ForeignKey, PrimaryKey, Unique};

    let customers = Table {
        name: "CUSTOMERS".to_string(),
        schema: "SALES".to_string(),
        kind: "TABLE".to_string(),
        row_count: 125_000,
        size_mb: 52.1,
        description: Some("Customer information and profiles".to_string()),
        columns: vec![
            column("CUSTOMER_ID", "NUMBER(10)", false, Some("CUSTOMERS_SEQ.NEXTVAL"), "Primary key"),
            column("FIRST_NAME", "VARCHAR2(50)", false, None, "Customer first name"),
            column("LAST_NAME", "VARCHAR2(50)", false, None, "Customer last name"),
            column("EMAIL", "VARCHAR2(100)", false, None, "Customer email address"),
            column("PHONE", "VARCHAR2(20)", true, None, "Customer phone number"),
            column("ADDRESS_DATA", "CLOB", true, None, "Customer address data"),
            column("REGISTRATION_DATE", "DATE", false, Some("SYSDATE"), "Account registration date"),
            column("LAST_LOGIN", "TIMESTAMP", true, None, "Last login timestamp"),
            column("IS_ACTIVE", "NUMBER(1)", false, Some("1"), "Account status"),
        ],
        indexes: vec![
            index("CUSTOMERS_PK", &["CUSTOMER_ID"], "PRIMARY KEY", true),
            index("CUSTOMERS_EMAIL_UK", &["EMAIL"], "UNIQUE", true),
            index("IDX_CUSTOMERS_NAME", &["LAST_NAME", "FIRST_NAME"], "NORMAL", false),
            index("IDX_CUSTOMERS_REG_DATE", &["REGISTRATION_DATE"], "NORMAL", false),
        ],
        constraints: vec![
            constraint("CUSTOMERS_PK", PrimaryKey, &["CUSTOMER_ID"], None),
            constraint("CUSTOMERS_EMAIL_UK", Unique, &["EMAIL"], None),
            constraint("CHK_IS_ACTIVE", Check, &[], Some("IS_ACTIVE IN (0,1)")),
        ],
    };

    let orders = Table {
        name: "ORDERS".to_string(),
        schema: "SALES".to_string(),
        kind: "TABLE".to_string(),
        row_count: 450_000,
        size_mb: 138.5,
        description: Some("Customer order information".to_string()),
        columns: vec![
            column("ORDER_ID", "NUMBER(10)", false, Some("ORDERS_SEQ.NEXTVAL"), "Primary key"),
            column("CUSTOMER_ID", "NUMBER(10)", false, None, "Reference to customers table"),
            column("ORDER_DATE", "DATE", false, Some("SYSDATE"), "Order creation date"),
            column("TOTAL_AMOUNT", "NUMBER(10,2)", false, None, "Order total amount"),
            column("STATUS", "VARCHAR2(20)", false, Some("'PENDING'"), "Order status"),
            column("SHIPPING_ADDRESS", "CLOB", true, None, "Shipping address data"),
            column("PAYMENT_METHOD", "VARCHAR2(50)", true, None, "Payment method used"),
        ],
        indexes: vec![
            index("ORDERS_PK", &["ORDER_ID"], "PRIMARY KEY", true),
            index("IDX_ORDERS_CUSTOMER", &["CUSTOMER_ID"], "NORMAL", false),
            index("IDX_ORDERS_DATE", &["ORDER_DATE"], "NORMAL", false),
            index("IDX_ORDERS_STATUS", &["STATUS"], "NORMAL", false),
        ],
        constraints: vec![
            constraint("ORDERS_PK", PrimaryKey, &["ORDER_ID"], None),
            constraint("FK_ORDERS_CUSTOMER", ForeignKey, &["CUSTOMER_ID"], Some("CUSTOMERS(CUSTOMER_ID)")),
            constraint("CHK_TOTAL_POSITIVE", Check, &[], Some("TOTAL_AMOUNT > 0")),
        ],
    };

    SchemaDocument {
        platform_name: Platform::Oracle.to_string(),
        database_info: database_info("ORCL", "Oracle Database 19c", "3.2 GB", "2023-01-20"),
        tables: vec![customers, orders],
        views: vec![View {
            name: "CUSTOMER_SUMMARY".to_string(),
            schema: "SALES".to_string(),
            definition: "SELECT c.CUSTOMER_ID, c.FIRST_NAME, c.LAST_NAME, COUNT(o.ORDER_ID) as TOTAL_ORDERS, NVL(SUM(o.TOTAL_AMOUNT), 0) as TOTAL_SPENT FROM CUSTOMERS c LEFT JOIN ORDERS o ON c.CUSTOMER_ID = o.CUSTOMER_ID GROUP BY c.CUSTOMER_ID, c.FIRST_NAME, c.LAST_NAME".to_string(),
            description: Some("Customer order summary view".to_string()),
        }],
        routines: vec![Routine {
            name: "CALCULATE_CUSTOMER_LTV".to_string(),
            schema: "SALES".to_string(),
            kind: RoutineKind::Procedure,
            parameters: "p_customer_id IN NUMBER, p_ltv OUT NUMBER".to_string(),
            return_type: None,
            description: Some("Calculates lifetime value for a customer".to_string()),
        }],
    }
}

fn sql_server() -> SchemaDocument {
    use ConstraintKind::{Check, ForeignKey, PrimaryKey, Unique};

    let customers = Table {
        name: "Customers".to_string(),
        schema: "dbo".to_string(),
        kind: "BASE TABLE".to_string(),
        row_count: 125_000,
        size_mb: 48.7,
        description: Some("Customer information and profiles".to_string()),
        columns: vec![
            column("CustomerID", "INT IDENTITY(1,1)", false, None, "Primary key"),
            column("FirstName", "NVARCHAR(50)", false, None, "Customer first name"),
            column("LastName", "NVARCHAR(50)", false, None, "Customer last name"),
            column("Email", "NVARCHAR(100)", false, None, "Customer email address"),
            column("Phone", "NVARCHAR(20)", true, None, "Customer phone number"),
            column("AddressData", "NVARCHAR(MAX)", true, None, "Customer address data in JSON"),
            column("RegistrationDate", "DATETIME2", false, Some("GETDATE()"), "Account registration date"),
            column("LastLogin", "DATETIME2", true, None, "Last login timestamp"),
            column("IsActive", "BIT", false, Some("1"), "Account status"),
        ],
        indexes: vec![
            index("PK_Customers", &["CustomerID"], "PRIMARY KEY", true),
            index("UQ_Customers_Email", &["Email"], "UNIQUE", true),
            index("IX_Customers_Name", &["LastName", "FirstName"], "NONCLUSTERED", false),
            index("IX_Customers_RegistrationDate", &["RegistrationDate"], "NONCLUSTERED", false),
        ],
        constraints: vec![
            constraint("PK_Customers", PrimaryKey, &["CustomerID"], None),
            constraint("UQ_Customers_Email", Unique, &["Email"], None),
            constraint("CK_Email_Format", Check, &[], Some("Email LIKE '%@%.%'")),
        ],
    };

    let orders = Table {
        name: "Orders".to_string(),
        schema: "dbo".to_string(),
        kind: "BASE TABLE".to_string(),
        row_count: 450_000,
        size_mb: 132.3,
        description: Some("Customer order information".to_string()),
        columns: vec![
            column("OrderID", "INT IDENTITY(1,1)", false, None, "Primary key"),
            column("CustomerID", "INT", false, None, "Reference to customers table"),
            column("OrderDate", "DATETIME2", false, Some("GETDATE()"), "Order creation date"),
            column("TotalAmount", "DECIMAL(10,2)", false, None, "Order total amount"),
            column("Status", "NVARCHAR(20)", false, Some("'Pending'"), "Order status"),
            column("ShippingAddress", "NVARCHAR(MAX)", true, None, "Shipping address in JSON"),
            column("PaymentMethod", "NVARCHAR(50)", true, None, "Payment method used"),
        ],
        indexes: vec![
            index("PK_Orders", &["OrderID"], "PRIMARY KEY", true),
            index("IX_Orders_Customer", &["CustomerID"], "NONCLUSTERED", false),
            index("IX_Orders_Date", &["OrderDate"], "NONCLUSTERED", false),
            index("IX_Orders_Status", &["Status"], "NONCLUSTERED", false),
        ],
        constraints: vec![
            constraint("PK_Orders", PrimaryKey, &["OrderID"], None),
            constraint("FK_Orders_Customer", ForeignKey, &["CustomerID"], Some("Customers(CustomerID)")),
            constraint("CK_TotalAmount_Positive", Check, &[], Some("TotalAmount > 0")),
        ],
    };

    SchemaDocument {
        platform_name: Platform::SqlServer.to_string(),
        database_info: database_info("ECommerceDB", "SQL Server 2022", "2.8 GB", "2023-01-18"),
        tables: vec![customers, orders],
        views: vec![View {
            name: "CustomerSummary".to_string(),
            schema: "dbo".to_string(),
            definition: "SELECT c.CustomerID, c.FirstName, c.LastName, COUNT(o.OrderID) as TotalOrders, ISNULL(SUM(o.TotalAmount), 0) as TotalSpent FROM Customers c LEFT JOIN Orders o ON c.CustomerID = o.CustomerID GROUP BY c.CustomerID, c.FirstName, c.LastName".to_string(),
            description: Some("Customer order summary view".to_string()),
        }],
        routines: vec![Routine {
            name: "CalculateCustomerLTV".to_string(),
            schema: "dbo".to_string(),
            kind: RoutineKind::Procedure,
            parameters: "@CustomerID INT, @LTV DECIMAL(10,2) OUTPUT".to_string(),
            return_type: None,
            description: Some("Calculates lifetime value for a customer".to_string()),
        }],
    }
}
