//! Static lookup tables that turn issue keys into human-readable text.
//!
//! Keys are the two-word classification keys produced by
//! [`crate::parser::statistic_key`] and [`crate::parser::issue_key`].

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Category;

/// Shown when an issue key has no explanation.
pub const DETAIL_UNAVAILABLE: &str = "Detail not available.";

/// Remediation guide for one issue key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueGuide {
    /// What the issue means.
    pub description: &'static str,
    /// How to resolve it.
    pub solution: &'static str,
    /// A short before/after example.
    pub code_example: &'static str,
}

/// Returned for keys without a guide.
pub const GUIDE_UNAVAILABLE: IssueGuide = IssueGuide {
    description: "Description not available.",
    solution: "Solution not available.",
    code_example: "Code example not available.",
};

/// Inclusive cyclomatic complexity range and its reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplexityBand {
    /// Lowest score in the band.
    pub min: u64,
    /// Highest score in the band.
    pub max: u64,
    /// What a score in the band means.
    pub description: &'static str,
}

const COMPLEXITY_BANDS: [ComplexityBand; 5] = [
    ComplexityBand {
        min: 1,
        max: 1000,
        description: "Cyclomatic complexity is a software metric used to quantify the complexity of a program. Developed by Thomas J. McCabe in 1976, it measures the number of linearly independent paths through a program's source code. This metric is crucial because it provides an insight into the complexity and potential risks associated with maintaining and testing the software. The calculation of cyclomatic complexity is based on the control flow graph of the program, where the formula V(G) = E - N + 2P is used, with E being the number of edges in the graph, N the number of nodes, and P the number of connected components. A higher cyclomatic complexity indicates a program with more paths, and hence, more complex and potentially more difficult to understand, test, and maintain. It's an invaluable tool in software development for identifying parts of the code that are complex and may require refactoring, as well as determining the minimum number of tests needed to achieve thorough coverage.",
    },
    ComplexityBand {
        min: 1,
        max: 10,
        description: "This code has minimal complexity. Such code usually consists of few conditional statements or loops, making it straightforward to understand, test, and maintain. Ideal for small functions or modules, indicating good coding practices and high maintainability.",
    },
    ComplexityBand {
        min: 11,
        max: 20,
        description: "This code has a moderate level of complexity. Such code usulaay contains several conditional statements and loops, introducing more paths through the code. While still manageable, the increased number of paths suggests that understanding and testing the code requires more effort compared to low complexity code.",
    },
    ComplexityBand {
        min: 21,
        max: 50,
        description: "This code has a high level of complexity. Such code is likely to have numerous conditional statements, loops, and possibly nested structures. Such complexity can make the code difficult to understand and maintain, and it poses significant challenges in testing and debugging.",
    },
    ComplexityBand {
        min: 51,
        max: 1000,
        description: "\n    This code is extremely complex, this range is usually a red flag.\n    It may encompass large modules with deeply nested structures,\n    multiple control flow paths, and intricate logic.\n    Code with very high complexity is often hard to maintain, understand, and test efficiently.\n    It's generally advisable to refactor such code to reduce complexity,\n    enhancing its readability and maintainability.\n  ",
    },
];

const SECURITY_SUMMARIES: &[(&str, &str)] = &[
    ("Potential hardcoded", "Potential hardcoded Secrets."),
    ("High entropy", "High entropy Strings."),
    ("Potential XSS", "Possibility of Cross-Site Scripting (XSS)."),
    (
        "Potential insecure",
        "Potentially insecure cryptographic algorithms.",
    ),
    ("Potential SQL", "Risk of SQL injection."),
    ("Potential race", "Race condition vulnerability."),
    (
        "Weak cryptographic",
        "Obsolete or insecure cryptographic algorithms.",
    ),
];

const QUALITY_SUMMARIES: &[(&str, &str)] = &[
    ("Access modifier", "Use more restrictive access modifiers."),
    ("Duplicate code", "Duplicate code."),
    (
        "Consider refactoring",
        "Refactoring loops to use lambdas and streams.",
    ),
];

const SMELL_SUMMARIES: &[(&str, &str)] = &[
    ("Javadoc Class", "Missing Javadoc documentation for classes."),
    ("Javadoc Method", "Missing Javadoc documentation for Methods."),
    ("Method Parameters", "Methods with too many parameters."),
    ("Generic catch", "Catch Block which is too general."),
    ("Swallowed exception", "Swallowing exceptions."),
];

const STYLE_SUMMARIES: &[(&str, &str)] = &[
    ("Incorrect indentation", "Incorrect indentation."),
    (
        "Opening brace",
        "Opening braces on the same line as the declaration.",
    ),
    (
        "Import Organisation",
        "Organize imports alphabetically for readability and consistency.",
    ),
    (
        "Local variable",
        "Local variables should be named using camelCase.",
    ),
    ("Magic number", "Replace magic numbers with named constants."),
    (
        "Method name",
        "Method names should start with a lowercase letter and follow camelCase.",
    ),
    (
        "Class or",
        "Class and interface names should start with an uppercase letter.",
    ),
];

const SECURITY_GUIDES: &[(&str, IssueGuide)] = &[
    (
        "High entropy",
        IssueGuide {
            description: "High entropy strings suggest complexity and randomness, often seen in security contexts like encryption keys.",
            solution: "Avoid embedding sensitive information in the code. Utilize environment variables for storing sensitive data.",
            code_example: "process.env.SECRET_KEY // Use environment variables for sensitive data",
        },
    ),
    (
        "Insecure import",
        IssueGuide {
            description: "This refers to the use of external libraries or modules that are outdated or have known security vulnerabilities.",
            solution: "Regularly update your dependencies to their latest versions.",
            code_example: "npm update // Regularly update packages using npm or similar tools",
        },
    ),
    (
        "Potential hardcoded",
        IssueGuide {
            description: "Indicates the presence of hard-coded sensitive information like passwords or API keys.",
            solution: "Store sensitive data in secure, external configurations.",
            code_example: "const apiSecret = process.env.API_SECRET // Use environment variables instead of hard-coded secrets",
        },
    ),
    (
        "Weak cryptographic",
        IssueGuide {
            description: "The use of obsolete or insecure cryptographic algorithms.",
            solution: "Transition to current cryptographic standards.",
            code_example: "crypto.createCipheriv('aes-256-gcm', key, iv) // Use modern and secure cryptographic functions",
        },
    ),
    (
        "Potential insecure",
        IssueGuide {
            description: "Refers to potentially insecure cryptographic algorithms or practices.",
            solution: "Ensure proper implementation and regular security audits.",
            code_example: "crypto.timingSafeEqual(buffer1, buffer2) // Use timing-safe methods for comparing sensitive data",
        },
    ),
    (
        "Potential race",
        IssueGuide {
            description: "Indicates a race condition vulnerability.",
            solution: "Implement proper synchronization and locking mechanisms.",
            code_example: "mutex.lock(); try { // critical section } finally { mutex.unlock() } // Proper synchronization in multi-threaded environments",
        },
    ),
    (
        "Potential SQL",
        IssueGuide {
            description: "Suggests a risk of SQL injection.",
            solution: "Employ prepared statements and parameterized queries.",
            code_example: "db.query('SELECT * FROM users WHERE id = ?', [userId]) // Use parameterized queries to prevent SQL injection",
        },
    ),
    (
        "Potential XSS",
        IssueGuide {
            description: "Indicates the possibility of Cross-Site Scripting (XSS) attacks.",
            solution: "Use secure coding practices to validate and sanitize user input.",
            code_example: "const safeInput = sanitizeHtml(userInput) // Sanitize user input to prevent XSS",
        },
    ),
];

const QUALITY_GUIDES: &[(&str, IssueGuide)] = &[
    (
        "Duplicate code",
        IssueGuide {
            description: "Duplicate code can lead to maintenance challenges and inconsistencies.",
            solution: "Refactor the code by extracting the duplicate parts into a single method or class.",
            code_example: "// Before Refactoring\n      int sum1 = a + b + c;\n      int sum2 = x + y + z;\n\n      // After Refactoring\n      int sum(int x, int y, int z) {\n        return x + y + z;\n      }\n      int sum1 = sum(a, b, c);\n      int sum2 = sum(x, y, z);",
        },
    ),
    (
        "Consider refactoring",
        IssueGuide {
            description: "Refactoring loops to use lambdas and streams can enhance readability and maintainability.",
            solution: "Use Java's Stream API to refactor loops for operations like filtering, mapping, and reducing.",
            code_example: "// Before Refactoring\n      for (String item : list) {\n        if (item.contains(\"a\")) {\n          System.out.println(item);\n        }\n      }\n\n      // After Refactoring\n      list.stream()\n        .filter(item -> item.contains(\"a\"))\n        .forEach(System.out::println);",
        },
    ),
    (
        "Access modifier",
        IssueGuide {
            description: "Using more restrictive access modifiers enhances encapsulation and security.",
            solution: "Limit the visibility of classes, methods, and variables as much as possible.",
            code_example: "// Before Refactoring\n      public int value;\n\n      // After Refactoring\n      private int value;",
        },
    ),
];

const SMELL_GUIDES: &[(&str, IssueGuide)] = &[
    (
        "Method Parameters",
        IssueGuide {
            description: "Methods with too many parameters can be hard to understand and maintain.",
            solution: "Consider using a parameter object or the Builder pattern.",
            code_example: "// Before: Method with too many parameters\n      public void createAccount(String username, String password, String email, String phone, String address) {\n        // method body\n      }\n\n      // After: Using a parameter object\n      public void createAccount(UserAccount account) {\n        // method body using account object\n      }",
        },
    ),
    (
        "Method Length",
        IssueGuide {
            description: "Long methods are difficult to read, understand, and debug.",
            solution: "Break down the method into smaller, more focused methods.",
            code_example: "// Before: Long method\n      public void processData() {\n        // multiple tasks mixed together\n      }\n\n      // After: Refactored into smaller methods\n      public void processData() {\n        taskOne();\n        taskTwo();\n        taskThree();\n      }\n\n      private void taskOne() { /* Task one implementation */ }\n      private void taskTwo() { /* Task two implementation */ }\n      private void taskThree() { /* Task three implementation */ }",
        },
    ),
    (
        "God Class",
        IssueGuide {
            description: "A 'God Class' centralizes too much functionality and is difficult to maintain.",
            solution: "Decompose the class into smaller, cohesive classes.",
            code_example: "// Before: God Class\n      public class AllInOne {\n        // too many responsibilities\n      }\n\n      // After: Decomposed classes\n      public class ResponsibilityOne { /* ... */ }\n      public class ResponsibilityTwo { /* ... */ }\n      public class ResponsibilityThree { /* ... */ }",
        },
    ),
    (
        "Large Class",
        IssueGuide {
            description: "Large classes handle too many responsibilities.",
            solution: "Refactor the class into smaller, more manageable classes.",
            code_example: "// Before: Large class\n      public class OverloadedClass {\n        // too many methods and variables\n      }\n\n      // After: Smaller, focused classes\n      public class FocusedClassOne { /* ... */ }\n      public class FocusedClassTwo { /* ... */ }",
        },
    ),
    (
        "Try Block",
        IssueGuide {
            description: "Empty or comment-only try blocks may lead to silent failures.",
            solution: "Properly handle exceptions in the try block.",
            code_example: "// Before: Empty try block\n      try {\n        // risky operation\n      } catch (Exception e) {\n        // empty or only a comment\n      }\n\n      // After: Proper exception handling\n      try {\n        // risky operation\n      } catch (Exception e) {\n        logError(e);\n        // or handle exception appropriately\n      }",
        },
    ),
    (
        "Data Clumps",
        IssueGuide {
            description: "Data clumps occur when multiple variables are often used together but not organized as an object.",
            solution: "Encapsulate them into a class.",
            code_example: "// Before: Data clump\n      public void processUser(String name, String email, String address) {\n        // use name, email, address together\n      }\n\n      // After: Encapsulated in a class\n      public void processUser(User user) {\n        // use user object\n      }",
        },
    ),
    (
        "Primitive Obsession",
        IssueGuide {
            description: "Overuse of primitives instead of small objects for simple tasks.",
            solution: "Use classes or enums to represent complex ideas.",
            code_example: "// Before: Primitive Obsession\n      public void setTemperature(int temperature) {\n        // use temperature\n      }\n\n      // After: Using a class\n      public void setTemperature(Temperature temperature) {\n        // use Temperature object\n      }",
        },
    ),
    (
        "Javadoc Class",
        IssueGuide {
            description: "Missing Javadoc documentation for classes.",
            solution: "Add Javadoc comments to classes, especially public APIs.",
            code_example: "// Before: No Javadoc\n      public class User {\n        // class content\n      }\n\n      // After: With Javadoc\n      /**\n       * Represents a user in the system.\n       */\n      public class User {\n        // class content\n      }",
        },
    ),
    (
        "Javadoc Method",
        IssueGuide {
            description: "Methods without Javadoc documentation can be unclear.",
            solution: "Document methods, especially public ones.",
            code_example: "// Before: No Javadoc\n      public void createUser(String username) {\n        // method content\n      }\n\n      // After: With Javadoc\n      /**\n       * Creates a new user with the given username.\n       * @param username the username of the new user\n       */\n      public void createUser(String username) {\n        // method content\n      }",
        },
    ),
    (
        "Dead Method",
        IssueGuide {
            description: "A method that is never used often indicates unnecessary or obsolete code. It can be a candidate for removal to clean up the codebase.",
            solution: "Identify and remove dead methods from the code. Regularly review the codebase for unused methods and consider tools for static code analysis to automate this process.",
            code_example: "// Before: Dead method\n      function unusedMethod() {\n          // method body\n      }\n      \n      // After: The method is removed if it's not used",
        },
    ),
    (
        "Excessive Method",
        IssueGuide {
            description: "Too many methods chained together in a single expression can lead to code that is hard to read and debug. It may also indicate a violation of the Law of Demeter, suggesting over-coupling between classes.",
            solution: "Break down the method chain into separate statements to enhance readability and maintainability. Consider redesigning the class structure to reduce coupling.",
            code_example: "// Before: Excessive method chaining\n      object.methodOne().methodTwo().methodThree();\n  \n      // After: Breaking down the chain\n      const intermediateResult = object.methodOne();\n      intermediateResult.methodTwo();\n      intermediateResult.methodThree();",
        },
    ),
    (
        "Generic catch",
        IssueGuide {
            description: "A catch block that is too general, such as catching a broad Exception type, can obscure the specific nature of errors and make debugging more difficult. It's usually better to catch specific exceptions.",
            solution: "Refine catch blocks to handle specific exceptions. This approach aids in precise error handling and improves the clarity and safety of the error-handling logic.",
            code_example: "// Before: Generic catch block\n      try {\n          // risky code\n      } catch (error) {\n          // handling\n      }\n  \n      // After: Catching specific errors\n      try {\n          // risky code\n      } catch (specificError) {\n          // specific handling\n      }",
        },
    ),
    (
        "Empty catch",
        IssueGuide {
            description: "An empty catch block captures an exception but does nothing with it, often leading to swallowed errors and making debugging challenging.",
            solution: "Ensure that catch blocks appropriately log or handle the exception. Avoid leaving catch blocks empty to prevent silent failures.",
            code_example: "// Before: Empty catch block\n      try {\n          // risky code\n      } catch (error) {\n          // empty\n      }\n  \n      // After: Logging the error\n      try {\n          // risky code\n      } catch (error) {\n          console.error(\"Error occurred:\", error);\n      }",
        },
    ),
    (
        "Swallowed exception",
        IssueGuide {
            description: "Similar to an empty catch block, this involves catching an exception but not adequately handling it, such as logging it without addressing the underlying issue, which can hide problems in the code.",
            solution: "Properly address exceptions by logging detailed information and re-throwing them when necessary. Ensure that all caught exceptions are either handled or documented for future handling.",
            code_example: "// Before: Swallowed exception\n      try {\n          // risky code\n      } catch (error) {\n          console.error(\"Error occurred\");\n      }\n  \n      // After: Properly handling the exception\n      try {\n          // risky code\n      } catch (error) {\n          console.error(\"Error occurred:\", error);\n          throw error; // re-throwing the error\n      }",
        },
    ),
];

const STYLE_GUIDES: &[(&str, IssueGuide)] = &[
    (
        "Incorrect indentation",
        IssueGuide {
            description: "Maintain consistent indentation for improved readability and structure.",
            solution: "Use a standard indentation style, like 4 spaces or a tab, consistently throughout your code.",
            code_example: "// Correct indentation\nif (condition) {\n    doSomething();\n}",
        },
    ),
    (
        "Class or",
        IssueGuide {
            description: "Class and interface names should start with an uppercase letter.",
            solution: "Rename classes and interfaces to start with uppercase letters.",
            code_example: "class MyClass {} // Class names start with an uppercase letter",
        },
    ),
    (
        "Method name",
        IssueGuide {
            description: "Method names should start with a lowercase letter and follow camelCase.",
            solution: "Rename methods to start with a lowercase letter.",
            code_example: "void myMethod() {} // Method names start with a lowercase letter",
        },
    ),
    (
        "Magic number",
        IssueGuide {
            description: "Replace magic numbers with named constants for clarity and maintainability.",
            solution: "Declare a constant for the magic number and use the constant in place of the number.",
            code_example: "const MAX_HEIGHT = 100; // Replace magic number with a named constant",
        },
    ),
    (
        "Opening brace",
        IssueGuide {
            description: "Place opening braces on the same line as the declaration.",
            solution: "Adjust brace placement to follow the 'end-of-line' style.",
            code_example: "if (condition) { // Opening brace on the same line\n    doSomething();\n}",
        },
    ),
    (
        "Import Organisation",
        IssueGuide {
            description: "Organize imports alphabetically for readability and consistency.",
            solution: "Sort your import statements alphabetically.",
            code_example: "import aPackage;\nimport bPackage; // Alphabetically sorted imports",
        },
    ),
    (
        "Constant variable",
        IssueGuide {
            description: "Name constant variables in uppercase for clear identification.",
            solution: "Use uppercase letters for constant variable names, separating words with underscores.",
            code_example: "const MAX_COUNT = 10; // Constant variable in uppercase",
        },
    ),
    (
        "Variable name",
        IssueGuide {
            description: "Use camelCase for variable naming to enhance readability.",
            solution: "Rename variables to use camelCase, starting with a lowercase letter.",
            code_example: "let myVariable = 5; // Variable names in camelCase",
        },
    ),
    (
        "Local variable",
        IssueGuide {
            description: "Local variables should be named using camelCase for consistency.",
            solution: "Follow camelCase naming for all local variables.",
            code_example: "int localValue = 10; // Local variable in camelCase",
        },
    ),
];

const SECURITY_EXPLANATIONS: &[(&str, &str)] = &[
    (
        "High entropy",
        "High entropy strings typically indicate complex, seemingly random strings often found in security-sensitive contexts, like encryption keys or tokens. In source code, these can be a sign of embedded sensitive information. High entropy is a measure of randomness and unpredictability, and while high entropy is good for security keys, finding such strings hardcoded in the code can suggest a security risk, like exposed secrets.",
    ),
    (
        "Insecure import",
        "Insecure imports refer to the inclusion of external libraries or modules in the codebase that are either outdated or have known security vulnerabilities. Relying on insecure imports can expose the application to various security threats, as attackers can exploit known vulnerabilities in these libraries.",
    ),
    (
        "Potential hardcoded",
        "This typically refers to embedding sensitive information directly within the source code, such as passwords, API keys, or cryptographic keys. Hardcoding such sensitive data makes the application vulnerable to security breaches if the code is exposed or accessible.",
    ),
    (
        "Weak cryptographic",
        "This indicates the use of outdated or proven-to-be-weak cryptographic algorithms for encryption, hashing, or signing. Such weak algorithms are more susceptible to being broken or bypassed by malicious actors, compromising the security of the data they are supposed to protect.",
    ),
    (
        "Potential insecure",
        "This refers to the possible use of cryptographic algorithms that are not necessarily known to be weak but are potentially insecure due to improper implementation, configuration, or emerging vulnerabilities. It's a caution against complacency in cryptographic practices.",
    ),
    (
        "Potential race",
        "A race condition occurs when the behavior of software is dependent on the sequence or timing of other uncontrollable events. It becomes a concern when different processes access and manipulate the same data concurrently, leading to unpredictable and erroneous behavior, often causing security vulnerabilities.",
    ),
    (
        "Potential SQL",
        "This is about the possible presence of code vulnerabilities that could allow SQL injection attacks. These occur when an attacker can insert or manipulate SQL queries in the input fields, potentially giving them unauthorized access to or control over the database.",
    ),
    (
        "Potential XSS",
        "XSS (Cross-Site Scripting) vulnerabilities refer to flaws in a web application that allow an attacker to inject malicious scripts into content viewed by other users. Such vulnerabilities can lead to unauthorized access to user data, session hijacking, and other malicious activities.",
    ),
];

const QUALITY_EXPLANATIONS: &[(&str, &str)] = &[
    (
        "Duplicate code",
        "To maintain a high-quality codebase, it's generally recommended to follow the DRY principle (Don't Repeat Yourself). This principle advocates for reducing the repetition of software patterns by abstracting common patterns into a single, reusable piece of code. This not only improves maintainability but also enhances the overall integrity and readability of the code.",
    ),
    (
        "Consider refactoring",
        "Refactoring a loop to use lambdas and streams in Java can significantly improve code readability, maintainability, and brevity. Streams, paired with lambdas, allow for more declarative and succinct expression of operations like filtering and mapping. This enhances readability and reduces error likelihood compared to traditional loops. Moreover, streams are easily parallelizable, potentially improving performance for large collections or intensive computations. However, their suitability varies depending on the complexity and performance requirements of the task.",
    ),
    (
        "Access modifier",
        "More restrictive access modifiers contribute to better software design by promoting encapsulation, improving maintainability, reducing bugs, clarifying API usage, enhancing security, and simplifying testing and debugging. However, it's also important to balance the use of restrictive access with the need for flexibility and functionality in your code.",
    ),
];

const SMELL_EXPLANATIONS: &[(&str, &str)] = &[
    (
        "Method Parameters",
        "When a method has too many parameters, it can be difficult to understand and maintain. A long parameter list may also indicate that the method is doing too much and potentially violates the Single Responsibility Principle.",
    ),
    (
        "Method Length",
        "A method that is too long is often a sign of poor organization. Long methods are harder to read, understand, and debug. They may encompass multiple functionalities, which should ideally be separated into smaller, more focused methods.",
    ),
    (
        "God Class",
        "A 'God Class' is an anti-pattern where a class knows too much or does too much. It's a large class that tends to centralize the functionality of a program and can be difficult to maintain or extend.",
    ),
    (
        "Large Class",
        "Similar to a God Class, a Large Class is overly extensive in terms of the number of lines of code. This often indicates that the class is handling too many responsibilities and should be refactored into smaller, more manageable classes.",
    ),
    (
        "Try Block",
        "An empty or comment-only try block may indicate an incomplete implementation or an error being improperly handled. This can lead to silent failures and bugs that are hard to track.",
    ),
    (
        "Data Clumps",
        "Data clumps occur when groups of variables are frequently used together but not structured as an object. This can be a sign that these variables should be encapsulated into a class to better represent their relationship and to enhance code reusability and clarity.",
    ),
    (
        "Primitive Obsession",
        "This issue arises when primitive data types are overused to represent complex ideas in the domain, rather than using classes or enums. This can lead to less expressive and less maintainable code.",
    ),
    (
        "Javadoc Class",
        "A class missing Javadoc documentation can be problematic in terms of maintainability and usability, especially in large codebases or public APIs, where clear documentation is essential.",
    ),
    (
        "Javadoc Method",
        "Similar to classes, methods without Javadoc documentation can hinder understanding and proper usage of the method, especially if the method’s purpose, parameters, and return values are not immediately clear from its name and context.",
    ),
    (
        "Dead Method",
        "A method that is never used (also known as a dead method) often indicates unnecessary or obsolete code. It can be a candidate for removal to clean up the codebase.",
    ),
    (
        "Excessive method",
        "Too many methods chained together in a single expression (method chaining) can lead to code that is hard to read and debug. It may also indicate a violation of the Law of Demeter, suggesting over-coupling between classes.",
    ),
    (
        "Generic catch",
        "A catch block that is too general, such as catching a broad Exception type, can obscure the specific nature of errors and make debugging more difficult. It's usually better to catch specific exceptions.",
    ),
    (
        "Empty catch",
        "An empty catch block captures an exception but does nothing with it, often leading to swallowed errors and making debugging challenging.",
    ),
    (
        "Swallowed exception",
        "Similar to an empty catch block, this involves catching an exception but not adequately handling it, such as logging it without addressing the underlying issue, which can hide problems in the code.",
    ),
];

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

/// Short summary shown next to a statistic key.
pub fn summary(category: Category, key: &str) -> Option<&'static str> {
    let table = match category {
        Category::Security => SECURITY_SUMMARIES,
        Category::CodeSmell => SMELL_SUMMARIES,
        Category::Quality => QUALITY_SUMMARIES,
        Category::Style => STYLE_SUMMARIES,
        Category::Complexity => return None,
    };
    lookup(table, key)
}

/// Remediation guide for a key, if one exists.
pub fn guide(category: Category, key: &str) -> Option<IssueGuide> {
    let table = match category {
        Category::Security => SECURITY_GUIDES,
        Category::CodeSmell => SMELL_GUIDES,
        Category::Quality => QUALITY_GUIDES,
        Category::Style => STYLE_GUIDES,
        Category::Complexity => return None,
    };
    lookup(table, key)
}

/// Remediation guide for a key, or the "not available" placeholders.
pub fn guide_or_placeholder(category: Category, key: &str) -> IssueGuide {
    guide(category, key).unwrap_or(GUIDE_UNAVAILABLE)
}

/// Long-form explanation of a key.
///
/// Style issues have no dedicated explanation table and reuse the guide.
pub fn explanation(category: Category, key: &str) -> &'static str {
    let found = match category {
        Category::Security => lookup(SECURITY_EXPLANATIONS, key),
        Category::CodeSmell => lookup(SMELL_EXPLANATIONS, key),
        Category::Quality => lookup(QUALITY_EXPLANATIONS, key),
        Category::Style => guide(category, key).map(|guide| guide.description),
        Category::Complexity => None,
    };
    found.unwrap_or(DETAIL_UNAVAILABLE)
}

/// Every band containing `score`, in table order.
pub fn complexity_bands(score: u64) -> Vec<ComplexityBand> {
    COMPLEXITY_BANDS
        .into_iter()
        .filter(|band| (band.min..=band.max).contains(&score))
        .collect()
}

/// A complexity band in owned form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BandReading {
    /// Lowest score in the band.
    pub min: u64,
    /// Highest score in the band.
    pub max: u64,
    /// What a score in the band means.
    pub description: String,
}

impl From<ComplexityBand> for BandReading {
    fn from(band: ComplexityBand) -> Self {
        Self {
            min: band.min,
            max: band.max,
            description: band.description.to_string(),
        }
    }
}

/// A cyclomatic complexity score with the bands describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityReading {
    /// The score.
    pub score: u64,
    /// Zero scores mean the run did not compute complexity.
    pub calculated: bool,
    /// Matching bands, or [`DETAIL_UNAVAILABLE`] alone when none match.
    pub bands: Vec<BandReading>,
}

/// Read a complexity score against the band table.
pub fn complexity_reading(score: u64) -> ComplexityReading {
    let mut bands: Vec<BandReading> = complexity_bands(score)
        .into_iter()
        .map(BandReading::from)
        .collect();
    if bands.is_empty() {
        bands.push(BandReading {
            min: score,
            max: score,
            description: DETAIL_UNAVAILABLE.to_string(),
        });
    }
    ComplexityReading {
        score,
        calculated: score != 0,
        bands,
    }
}

/// Everything known about one issue key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueDescription {
    /// Category the key belongs to.
    pub category: Category,
    /// The classification key.
    pub key: String,
    /// Short summary, or the key itself.
    pub summary: String,
    /// Guide description.
    pub description: String,
    /// Guide solution.
    pub solution: String,
    /// Guide code example.
    pub code_example: String,
    /// Long-form explanation.
    pub explanation: String,
    /// Whether any table knows the key.
    pub known: bool,
}

/// Collect every table entry for a key.
pub fn describe(category: Category, key: &str) -> IssueDescription {
    let key = key.trim();
    let found = guide(category, key);
    let summary_text = summary(category, key);
    let explanation_text = explanation(category, key);
    let known =
        found.is_some() || summary_text.is_some() || explanation_text != DETAIL_UNAVAILABLE;
    let guide = found.unwrap_or(GUIDE_UNAVAILABLE);
    IssueDescription {
        category,
        key: key.to_string(),
        summary: summary_text.unwrap_or(key).to_string(),
        description: guide.description.to_string(),
        solution: guide.solution.to_string(),
        code_example: guide.code_example.to_string(),
        explanation: explanation_text.to_string(),
        known,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_fall_back_to_none_for_unknown_keys() {
        assert_eq!(
            summary(Category::Security, "Potential SQL"),
            Some("Risk of SQL injection.")
        );
        assert_eq!(summary(Category::Security, "Magic number"), None);
        assert_eq!(summary(Category::Complexity, "anything"), None);
    }

    #[test]
    fn unknown_guides_use_placeholders() {
        let guide = guide_or_placeholder(Category::Quality, "Nope nope");
        assert_eq!(guide, GUIDE_UNAVAILABLE);
        assert_eq!(guide.solution, "Solution not available.");
        assert!(super::guide(Category::CodeSmell, "God Class").is_some());
    }

    #[test]
    fn explanations_cover_style_through_guides() {
        assert_eq!(
            explanation(Category::Style, "Magic number"),
            "Replace magic numbers with named constants for clarity and maintainability."
        );
        assert_eq!(explanation(Category::Security, "Unknown key"), DETAIL_UNAVAILABLE);
        assert!(explanation(Category::Quality, "Duplicate code").contains("DRY"));
    }

    #[test]
    fn tables_carry_full_entries() {
        let guide = super::guide(Category::Quality, "Access modifier").expect("guide");
        assert_eq!(
            guide,
            IssueGuide {
                description: "Using more restrictive access modifiers enhances encapsulation and security.",
                solution: "Limit the visibility of classes, methods, and variables as much as possible.",
                code_example: "// Before Refactoring\n      public int value;\n\n      // After Refactoring\n      private int value;",
            }
        );
        assert_eq!(
            super::guide(Category::Style, "Magic number")
                .expect("guide")
                .code_example,
            "const MAX_HEIGHT = 100; // Replace magic number with a named constant"
        );
        assert_eq!(
            explanation(Category::Security, "Potential SQL"),
            "This is about the possible presence of code vulnerabilities that could allow SQL injection attacks. These occur when an attacker can insert or manipulate SQL queries in the input fields, potentially giving them unauthorized access to or control over the database."
        );
        assert_eq!(
            complexity_bands(5)[1].description,
            "This code has minimal complexity. Such code usually consists of few conditional statements or loops, making it straightforward to understand, test, and maintain. Ideal for small functions or modules, indicating good coding practices and high maintainability."
        );
        assert!(complexity_bands(60)[1]
            .description
            .trim()
            .starts_with("This code is extremely complex, this range is usually a red flag.\n"));
    }

    #[test]
    fn complexity_bands_are_inclusive() {
        assert_eq!(complexity_bands(0).len(), 0);
        assert_eq!(complexity_bands(1).len(), 2);
        let ten: Vec<u64> = complexity_bands(10).iter().map(|band| band.max).collect();
        assert_eq!(ten, vec![1000, 10]);
        assert_eq!(complexity_bands(11)[1].min, 11);
        assert_eq!(complexity_bands(50)[1].max, 50);
        assert_eq!(complexity_bands(51)[1].min, 51);
        assert_eq!(complexity_bands(1000).len(), 2);
        assert!(complexity_bands(1001).is_empty());
    }

    #[test]
    fn complexity_reading_flags_uncalculated_scores() {
        let reading = complexity_reading(15);
        assert!(reading.calculated);
        assert_eq!(reading.bands.len(), 2);
        assert_eq!(reading.bands[1].min, 11);

        let missing = complexity_reading(0);
        assert!(!missing.calculated);
        assert_eq!(missing.bands[0].description, DETAIL_UNAVAILABLE);
    }

    #[test]
    fn describe_merges_tables() {
        let described = describe(Category::Style, " Magic number ");
        assert!(described.known);
        assert_eq!(described.key, "Magic number");
        assert_eq!(
            described.summary,
            "Replace magic numbers with named constants."
        );

        let unknown = describe(Category::Style, "Odd thing");
        assert!(!unknown.known);
        assert_eq!(unknown.summary, "Odd thing");
        assert_eq!(unknown.code_example, "Code example not available.");
        assert_eq!(unknown.explanation, DETAIL_UNAVAILABLE);
    }
}
